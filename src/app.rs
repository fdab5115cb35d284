// src/app.rs
//
// Calculatrice RPN : module App (racine)
// --------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs + persistance.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Important:
// - Le clavier est lu une seule fois par frame (clavier() dans vue.rs), avant la vue.
// - La sauvegarde passe par eframe (autosave + fermeture), sauf avec `-q`.

pub mod etat;
pub mod persistance;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.clavier(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });

        // YANK : dépôt dans le presse-papiers système
        if let Some(texte) = self.presse_papiers.take() {
            ctx.copy_text(texte);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if self.session {
            persistance::sauver(storage, &self.calc);
        }
    }
}
