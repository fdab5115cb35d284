// src/app/vue.rs
//
// Vue (UI egui), natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : toutes les touches passent par AppCalc::touche (pas de TextEdit,
//   la saisie est gérée par l’état)
// - Tactile : pavé numérique + un bouton par commande du catalogue
//
// Disposition :
//   titre / erreur / message
//   pile (N lignes, 1: en bas) + saisie en cours
//   pavé numérique + commandes
//   historique (repliable, plus récent en bas)

use eframe::egui;

use crate::noyau::catalogue::{COMMANDES, UNDO};

use super::etat::{AppCalc, ENTREE, RETOUR};

/// Vert des confirmations ("undo", "yanked to clipboard").
const VERT_MESSAGE: egui::Color32 = egui::Color32::from_rgb(0x22, 0xc5, 0x5e);

impl AppCalc {
    /// Clavier global : à appeler une fois par frame, avant la vue.
    pub fn clavier(&mut self, ctx: &egui::Context) {
        let evenements = ctx.input(|i| i.events.clone());
        for ev in evenements {
            match ev {
                egui::Event::Text(texte) => {
                    for c in texte.chars() {
                        self.touche(c.encode_utf8(&mut [0u8; 4]));
                    }
                }
                egui::Event::Paste(texte) => self.coller(&texte),
                egui::Event::Key {
                    key, pressed: true, ..
                } => match key {
                    egui::Key::Enter => self.touche(ENTREE),
                    egui::Key::Backspace => self.touche(RETOUR),
                    egui::Key::Escape => self.touche("esc"),
                    _ => {}
                },
                _ => {}
            }
        }
    }

    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice RPN");
                self.ui_messages(ui);
                ui.add_space(6.0);

                self.ui_pile(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_pave_numerique(ui);
                ui.add_space(8.0);
                self.ui_commandes(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
            });
    }

    fn ui_messages(&self, ui: &mut egui::Ui) {
        if !self.erreur.is_empty() {
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        } else if !self.message.is_empty() {
            ui.colored_label(VERT_MESSAGE, &self.message);
        } else {
            // hauteur stable
            ui.label("");
        }
    }

    fn ui_pile(&self, ui: &mut egui::Ui) {
        let faible = ui.visuals().weak_text_color();
        let fort = ui.visuals().strong_text_color();

        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                for ligne in self.calc.affichage() {
                    let (rang, valeur) = ligne.split_once(':').unwrap_or((ligne.as_str(), ""));
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(format!("{rang}:")).monospace().color(faible));
                        ui.label(egui::RichText::new(valeur).monospace().size(18.0).color(fort));
                    });
                }
                if self.saisie_visible {
                    ui.monospace(format!("  {}_", self.entree));
                }
            });
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_rpn")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_touche(ui, "7", "7");
                self.bouton_touche(ui, "8", "8");
                self.bouton_touche(ui, "9", "9");
                self.bouton_touche(ui, "⌫", RETOUR);
                ui.end_row();

                self.bouton_touche(ui, "4", "4");
                self.bouton_touche(ui, "5", "5");
                self.bouton_touche(ui, "6", "6");
                self.bouton_touche(ui, "±", "n");
                ui.end_row();

                self.bouton_touche(ui, "1", "1");
                self.bouton_touche(ui, "2", "2");
                self.bouton_touche(ui, "3", "3");
                self.bouton_touche(ui, ".", ".");
                ui.end_row();

                self.bouton_touche(ui, "0", "0");
                ui.label("");
                ui.label("");
                self.bouton_touche(ui, "ENTER", ENTREE);
                ui.end_row();
            });
    }

    /// Un bouton par commande, infobulle = touche liée.
    fn ui_commandes(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for cmd in COMMANDES {
                let tip = match cmd.touche {
                    Some(t) => format!("touche : {t}"),
                    None => "pas de touche".to_string(),
                };
                let actif = cmd.nom != UNDO || self.annulation_possible();
                let resp = ui
                    .add_enabled_ui(actif, |ui| {
                        ui.add_sized([56.0, 30.0], egui::Button::new(cmd.nom))
                    })
                    .inner
                    .on_hover_text(tip);
                if resp.clicked() {
                    self.commande(cmd.nom);
                }
            }
        });
    }

    fn ui_historique(&self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Historique")
            .default_open(true)
            .show(ui, |ui| {
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        if self.calc.historique().is_empty() {
                            ui.weak("(vide)");
                        }
                        for ligne in self.calc.historique() {
                            ui.monospace(ligne);
                        }
                    });
            });
    }

    fn bouton_touche(&mut self, ui: &mut egui::Ui, label: &str, touche: &str) {
        let resp = ui.add_sized([56.0, 30.0], egui::Button::new(label));
        if resp.clicked() {
            self.touche(touche);
        }
    }
}
