use eframe::egui;

use crate::config::resolve_media_url;
use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState, base_url: &str) {
    let Some(contact) = &state.active_contact else {
        ui.label("Select a conversation to start chatting");
        return;
    };

    ui.horizontal(|ui| {
        ui.heading(contact.name.as_str());
        ui.label(egui::RichText::new(format!("@{}", contact.username)).weak());
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .max_height((ui.available_height() - 80.0).max(120.0))
        .show(ui, |ui| {
            if state.messages.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
            }

            for message in &state.messages {
                let sender = if state.is_own(message) {
                    "You"
                } else {
                    contact.name.as_str()
                };
                let time = message.created_at.format("%H:%M");

                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(format!("[{time}] {sender}:")).strong());
                    if let Some(text) = message.text.as_deref().filter(|t| !t.is_empty()) {
                        ui.label(text);
                    }
                    if let Some(image) = &message.image {
                        ui.hyperlink_to("image", resolve_media_url(base_url, image));
                    }
                });
            }
        });
}
