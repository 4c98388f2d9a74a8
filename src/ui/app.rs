use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent, User};

use super::components::{
    auth_form, chat_area, input_bar, profile_panel,
    sidebar::{self, SidebarActions},
};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    base_url: String,
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        user: Option<User>,
        base_url: String,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        Self {
            state: AppState::new(user),
            base_url,
            command_sender,
            event_receiver,
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply(event);
        }
    }

    fn send_command(&mut self, command: NetworkCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
            let command = match err {
                mpsc::error::TrySendError::Full(command)
                | mpsc::error::TrySendError::Closed(command) => command,
            };
            self.state.command_dropped(&command);
        }
    }

    fn handle_sidebar(&mut self, actions: SidebarActions) {
        if actions.search_changed {
            let command = self.state.search_command();
            self.send_command(command);
        }
        if let Some(contact) = actions.selected {
            let command = self.state.select_contact(contact);
            self.send_command(command);
        }
        if actions.open_profile {
            self.state.open_profile();
        }
        if actions.logout {
            self.send_command(NetworkCommand::Logout);
        }
    }

    fn show_auth(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Relay Chat");
            ui.separator();

            let actions = auth_form::render(ui, &mut self.state);
            if actions.submit && !self.state.auth_pending {
                if let Ok(command) = self.state.submit_auth() {
                    self.send_command(command);
                }
            }

            show_error(ui, self.state.error.as_deref());
        });
    }

    fn show_chat(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("contact_sidebar")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let actions = sidebar::render(ui, &mut self.state);
                self.handle_sidebar(actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            show_error(ui, self.state.error.as_deref());

            if self.state.profile.open {
                let actions = profile_panel::render(ui, &mut self.state.profile);
                if actions.save {
                    if let Ok(command) = self.state.submit_profile() {
                        self.send_command(command);
                    }
                }
                if actions.cancel {
                    self.state.profile.open = false;
                }
                return;
            }

            chat_area::render(ui, &self.state, &self.base_url);

            if self.state.active_contact.is_some() {
                ui.separator();
                let send = input_bar::render(
                    ui,
                    &mut self.state.draft_text,
                    &mut self.state.draft_image_path,
                );
                if send {
                    if let Some(command) = self.state.compose() {
                        self.send_command(command);
                    }
                }
            }
        });
    }
}

fn show_error(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(error) = error {
        ui.colored_label(egui::Color32::RED, error);
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        if self.state.signed_in() {
            self.show_chat(ctx);
        } else {
            self.show_auth(ctx);
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
