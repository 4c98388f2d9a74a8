use eframe::egui;

use crate::ui::state::ProfileForm;

#[derive(Default)]
pub struct ProfileActions {
    pub save: bool,
    pub cancel: bool,
}

pub fn render(ui: &mut egui::Ui, form: &mut ProfileForm) -> ProfileActions {
    let mut actions = ProfileActions::default();

    ui.heading("Edit profile");
    ui.separator();

    ui.label("Name:");
    ui.text_edit_singleline(&mut form.name);
    ui.label("Caption:");
    ui.text_edit_singleline(&mut form.caption);
    ui.label("Photo file:");
    ui.add(egui::TextEdit::singleline(&mut form.photo_path).hint_text("optional path"));

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            actions.save = true;
        }
        if ui.button("Cancel").clicked() {
            actions.cancel = true;
        }
    });

    actions
}
