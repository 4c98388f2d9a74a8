use eframe::egui;

use crate::ui::state::{AppState, AuthMode};

#[derive(Default)]
pub struct AuthActions {
    pub submit: bool,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> AuthActions {
    let mut actions = AuthActions::default();
    let signup = state.auth.mode == AuthMode::Signup;

    ui.heading(if signup { "Create account" } else { "Sign in" });
    ui.separator();

    if signup {
        ui.label("Name:");
        ui.text_edit_singleline(&mut state.auth.name);
    }

    ui.label("Username:");
    ui.text_edit_singleline(&mut state.auth.username);

    ui.label("Password:");
    let password = ui.add(egui::TextEdit::singleline(&mut state.auth.password).password(true));
    if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        actions.submit = true;
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let label = if signup { "Sign up" } else { "Log in" };
        if ui
            .add_enabled(!state.auth_pending, egui::Button::new(label))
            .clicked()
        {
            actions.submit = true;
        }

        let switch = if signup {
            "Have an account? Log in"
        } else {
            "New here? Sign up"
        };
        if ui.link(switch).clicked() {
            state.toggle_auth_mode();
        }
    });

    if state.auth_pending {
        ui.label(egui::RichText::new("Signing in...").weak());
    }

    actions
}
