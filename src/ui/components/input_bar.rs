use eframe::egui;

/// Returns true when the user asked to send the current draft.
pub fn render(ui: &mut egui::Ui, text: &mut String, image_path: &mut String) -> bool {
    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.add(egui::TextEdit::singleline(text).hint_text("Message"));
        if ui.button("Send").clicked() {
            send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
        }
    });
    ui.horizontal(|ui| {
        ui.label("Image file:");
        ui.add(egui::TextEdit::singleline(image_path).hint_text("optional path"));
    });

    send
}
