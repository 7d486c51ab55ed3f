use crate::search_list::{Activation, OpenTarget};

/// Opens URLs in the browser.
pub trait TabNavigator {
    /// Replace the location of the currently active tab.
    fn replace_current(&mut self, url: &str) -> anyhow::Result<()>;
    /// Open a new tab without focusing it.
    fn open_background(&mut self, url: &str) -> anyhow::Result<()>;
}

/// Route an activation to `nav`, returning where it was opened.
pub fn dispatch(nav: &mut dyn TabNavigator, activation: &Activation) -> anyhow::Result<OpenTarget> {
    match activation {
        Activation::Open {
            url,
            target: OpenTarget::CurrentTab,
        }
        | Activation::WebSearch { url } => {
            tracing::info!(%url, "opening in current tab");
            nav.replace_current(url)?;
            Ok(OpenTarget::CurrentTab)
        }
        Activation::Open {
            url,
            target: OpenTarget::BackgroundTab,
        } => {
            tracing::info!(%url, "opening in background tab");
            nav.open_background(url)?;
            Ok(OpenTarget::BackgroundTab)
        }
    }
}

/// Hands URLs to the default browser. Desktop browsers do not expose their
/// active tab, so both operations open the URL; the popup closes after a
/// current tab activation and stays open for background ones.
#[derive(Default)]
pub struct SystemBrowser;

impl TabNavigator for SystemBrowser {
    fn replace_current(&mut self, url: &str) -> anyhow::Result<()> {
        open::that(url)?;
        Ok(())
    }

    fn open_background(&mut self, url: &str) -> anyhow::Result<()> {
        open::that_detached(url)?;
        Ok(())
    }
}
