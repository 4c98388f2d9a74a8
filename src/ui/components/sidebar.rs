use crate::common::User;
use crate::ui::state::AppState;
use eframe::egui;

#[derive(Default)]
pub struct SidebarActions {
    pub search_changed: bool,
    pub selected: Option<User>,
    pub open_profile: bool,
    pub logout: bool,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> SidebarActions {
    let mut actions = SidebarActions::default();

    if let Some(user) = &state.user {
        ui.heading(user.name.as_str());
        if let Some(caption) = user.caption.as_deref().filter(|c| !c.is_empty()) {
            ui.label(egui::RichText::new(caption).weak());
        }
    }
    ui.horizontal(|ui| {
        if ui.button("Profile").clicked() {
            actions.open_profile = true;
        }
        if ui.button("Log out").clicked() {
            actions.logout = true;
        }
    });
    ui.separator();

    ui.label("Search:");
    if ui.text_edit_singleline(&mut state.search_query).changed() {
        actions.search_changed = true;
    }
    ui.separator();

    let contacts = state.visible_contacts();
    if contacts.is_empty() {
        ui.label(if state.search_query.trim().is_empty() {
            "No conversations yet"
        } else {
            "No users found"
        });
        return actions;
    }

    let active_id = state.active_contact.as_ref().map(|c| c.id.as_str());
    egui::ScrollArea::vertical().show(ui, |ui| {
        for contact in contacts {
            ui.horizontal(|ui| {
                let selected = active_id == Some(contact.id.as_str());
                if ui
                    .add(egui::Button::new(contact.name.as_str()).selected(selected))
                    .clicked()
                {
                    actions.selected = Some(contact.clone());
                }

                ui.label(egui::RichText::new(format!("@{}", contact.username)).weak());

                if let Some(unread) = contact.unread_count.filter(|count| *count > 0) {
                    ui.colored_label(egui::Color32::LIGHT_GREEN, format!("({unread})"));
                }
            });
        }
    });

    actions
}
