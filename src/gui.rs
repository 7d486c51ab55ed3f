use crate::entry::Entry;
use crate::loader::{error_message, LoadOutcome};
use crate::navigator::{dispatch, TabNavigator};
use crate::search_list::{Activation, OpenTarget, SearchList};
use crate::settings::Settings;
use eframe::egui;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

/// Keys taken from egui's input queue before the search box sees them.
pub const NAV_KEYS: [egui::Key; 3] = [egui::Key::ArrowDown, egui::Key::ArrowUp, egui::Key::Enter];

pub enum LoadState {
    Loading(Receiver<LoadOutcome>),
    Ready,
    Failed(String),
}

pub struct PopupApp {
    pub list: SearchList,
    pub state: LoadState,
    /// Last navigation failure, shown below the search box.
    pub error: Option<String>,
    navigator: Box<dyn TabNavigator>,
    focus_query: bool,
}

impl PopupApp {
    pub fn new(
        settings: &Settings,
        loader: Receiver<LoadOutcome>,
        navigator: Box<dyn TabNavigator>,
    ) -> Self {
        Self {
            list: SearchList::new(Vec::new(), &settings.search_engine),
            state: LoadState::Loading(loader),
            error: None,
            navigator,
            focus_query: true,
        }
    }

    /// Check the loader for its outcome. Returns `true` while still loading.
    pub fn poll_loader(&mut self) -> bool {
        let LoadState::Loading(rx) = &self.state else {
            return false;
        };
        match rx.try_recv() {
            Ok(Ok(entries)) => {
                self.populate(entries);
                false
            }
            Ok(Err(detail)) => {
                self.state = LoadState::Failed(error_message(&detail));
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                self.state = LoadState::Failed(error_message("loader stopped unexpectedly"));
                false
            }
        }
    }

    fn populate(&mut self, entries: Vec<Entry>) {
        tracing::debug!(count = entries.len(), "populating list");
        self.list.extend(entries);
        self.state = LoadState::Ready;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    pub fn query(&self) -> &str {
        self.list.query()
    }

    /// Text box edits land here: re-filter and select the first match.
    pub fn set_query(&mut self, query: &str) {
        self.list.set_query(query);
    }

    /// Handle a navigation key. Returns the activation produced by `Enter`.
    pub fn handle_key(&mut self, key: egui::Key, modifiers: egui::Modifiers) -> Option<Activation> {
        match key {
            egui::Key::ArrowDown => {
                self.list.move_down();
                None
            }
            egui::Key::ArrowUp => {
                self.list.move_up();
                None
            }
            egui::Key::Enter => self.list.commit(OpenTarget::from_modifiers(
                modifiers.ctrl,
                modifiers.command || modifiers.mac_cmd,
                modifiers.shift,
            )),
            _ => None,
        }
    }

    /// Open the activation. Returns `true` when the popup should close.
    pub fn activate(&mut self, activation: &Activation) -> bool {
        match dispatch(self.navigator.as_mut(), activation) {
            Ok(target) => {
                self.error = None;
                target == OpenTarget::CurrentTab
            }
            Err(e) => {
                tracing::warn!("failed to open url: {e:#}");
                self.error = Some(format!("Failed: {e}"));
                false
            }
        }
    }

    /// Select the visible row at `pos` and activate it, as a mouse click
    /// does. Out of range positions do nothing.
    pub fn click_row(&mut self, pos: usize, modifiers: egui::Modifiers) -> Option<Activation> {
        if pos >= self.list.visible_len() {
            return None;
        }
        self.list.select_visible(pos);
        self.handle_key(egui::Key::Enter, modifiers)
    }

    /// Item index of the row to scroll into view, once per selection change.
    pub fn scroll_target(&mut self) -> Option<usize> {
        if self.list.take_scroll_request() {
            self.list.selected_item()
        } else {
            None
        }
    }

    /// Remove navigation key presses from this frame's input and apply them
    /// in order, each with the modifiers held when it was pressed. Other
    /// events stay queued for the search box.
    pub fn consume_nav_keys(&mut self, ctx: &egui::Context) -> Option<Activation> {
        let pressed: Vec<(egui::Key, egui::Modifiers)> = ctx.input_mut(|i| {
            let mut keys = Vec::new();
            i.events.retain(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if NAV_KEYS.contains(key) => {
                    keys.push((*key, *modifiers));
                    false
                }
                _ => true,
            });
            keys
        });
        let mut activation = None;
        for (key, mods) in pressed {
            if let Some(a) = self.handle_key(key, mods) {
                activation = Some(a);
            }
        }
        activation
    }

    fn show_list(&mut self, ui: &mut egui::Ui) -> Option<usize> {
        let scroll_to = self.scroll_target();
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (pos, &idx) in self.list.visible().iter().enumerate() {
                    let entry = &self.list.items()[idx].entry;
                    let selected = self.list.is_selected(idx);
                    let resp = ui
                        .add_sized(
                            [ui.available_width(), 0.0],
                            egui::SelectableLabel::new(selected, entry.title.as_str()),
                        )
                        .on_hover_text(entry.url.as_str());
                    if scroll_to == Some(idx) {
                        resp.scroll_to_me(Some(egui::Align::Center));
                    }
                    if resp.clicked() {
                        clicked = Some(pos);
                    }
                }
            });
        clicked
    }
}

impl eframe::App for PopupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.poll_loader() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let mut activation = self.consume_nav_keys(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut query = self.list.query().to_string();
            let input = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("Search bookmarks")
                    .desired_width(f32::INFINITY),
            );
            if self.focus_query {
                input.request_focus();
                self.focus_query = false;
            }
            if input.changed() {
                self.set_query(&query);
            }

            match &self.state {
                LoadState::Loading(_) => {
                    ui.label("Loading...");
                }
                LoadState::Failed(message) => {
                    ui.colored_label(egui::Color32::RED, message.as_str());
                }
                LoadState::Ready => {}
            }
            if let Some(err) = &self.error {
                ui.colored_label(egui::Color32::RED, err.as_str());
            }

            if let Some(pos) = self.show_list(ui) {
                let mods = ctx.input(|i| i.modifiers);
                activation = self.click_row(pos, mods);
            }
        });

        if let Some(a) = activation {
            if self.activate(&a) {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}
