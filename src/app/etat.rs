//! src/app/etat.rs
//!
//! État UI : la calculatrice + la saisie en cours + les messages.
//!
//! Rôle : traduire les touches (clavier ou boutons) en actions sur le noyau,
//! sans rien dessiner.
//!
//! Contrats :
//! - Une touche liée à une commande lance la commande (saisie entrée implicitement avant).
//! - Pendant la saisie : `n` inverse le signe, `z` abandonne la saisie.
//! - Sans saisie : Entrée = DUP, Retour arrière = DROP.
//! - Toute erreur est affichée "COMMANDE: raison" et referme la saisie.

use crate::noyau::catalogue::{self, DROP, DUP, NEG, UNDO, YANK};
use crate::noyau::{Calculatrice, Decimal, Reglages};

use super::persistance;

/// Touches qui ouvrent la saisie.
const TOUCHES_NOMBRE: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "."];

pub const ENTREE: &str = "enter";
pub const RETOUR: &str = "backspace";

#[derive(Clone, Debug, Default)]
pub struct AppCalc {
    pub calc: Calculatrice,

    // --- saisie ---
    pub entree: String,
    pub saisie_visible: bool,

    // --- messages (effacés à chaque touche) ---
    pub erreur: String,
    pub message: String,

    /// Texte à déposer dans le presse-papiers à la prochaine frame (YANK).
    pub presse_papiers: Option<String>,

    /// Session sauvegardée à la fermeture (false avec `-q`).
    pub session: bool,
}

impl AppCalc {
    /// Calculatrice neuve + session rechargée depuis le stockage eframe (s’il y en a un).
    pub fn nouvelle(reglages: Reglages, stockage: Option<&dyn eframe::Storage>) -> Self {
        let mut calc = Calculatrice::new(reglages);
        persistance::charger(stockage, &mut calc);
        Self {
            calc,
            session: true,
            ..Self::default()
        }
    }

    /// Calculatrice neuve, rien n’est relu ni sauvegardé.
    pub fn sans_session(reglages: Reglages) -> Self {
        Self {
            calc: Calculatrice::new(reglages),
            ..Self::default()
        }
    }

    /* ------------------------ Touches ------------------------ */

    /// Une touche : caractère simple ("7", "+", "n") ou nom ("enter", "backspace", "esc").
    pub fn touche(&mut self, touche: &str) {
        self.effacer_messages();
        if let Err(e) = self.traiter_touche(touche) {
            self.set_erreur(e);
        }
    }

    /// Bouton de commande (même chemin que la touche liée).
    pub fn commande(&mut self, nom: &str) {
        self.effacer_messages();
        if let Err(e) = self.lancer(nom) {
            self.set_erreur(e);
        }
    }

    fn traiter_touche(&mut self, touche: &str) -> Result<(), String> {
        if let Some(cmd) = catalogue::par_touche(touche) {
            return self.lancer(cmd.nom);
        }

        if !self.saisie_visible {
            match touche {
                RETOUR => return self.lancer(DROP),
                ENTREE => return self.lancer(DUP),
                t if TOUCHES_NOMBRE.contains(&t) => self.saisie_visible = true,
                _ => {}
            }
        }

        if self.saisie_visible {
            match touche {
                ENTREE => return self.valider(true),
                RETOUR => {
                    self.entree.pop();
                }
                t if t.chars().count() == 1 => self.entree.push_str(t),
                _ => {}
            }
        }
        Ok(())
    }

    /// Lance une commande ; la saisie en cours est d’abord entrée (implicitement).
    fn lancer(&mut self, nom: &str) -> Result<(), String> {
        if self.saisie_visible {
            if nom == NEG {
                return self.inverser_signe_saisie();
            }
            if nom == UNDO {
                self.message = "undo".into();
                self.fermer_saisie();
                return Ok(());
            }
            self.valider(false)?;
        }

        self.calc.executer(nom).map_err(|e| format!("{nom}: {e}"))?;

        match nom {
            YANK => {
                self.presse_papiers = self.calc.sommet().map(Decimal::to_string);
                self.message = "yanked to clipboard".into();
            }
            UNDO => self.message = "undo".into(),
            _ => {}
        }
        Ok(())
    }

    /// Entre la saisie (si non vide) et referme le champ.
    fn valider(&mut self, explicite: bool) -> Result<(), String> {
        if !self.entree.is_empty() {
            let valeur: Decimal = self.entree.parse().map_err(|e| format!("{e}"))?;
            self.calc.entrer(valeur, explicite);
        }
        self.fermer_saisie();
        Ok(())
    }

    fn inverser_signe_saisie(&mut self) -> Result<(), String> {
        if self.entree.is_empty() {
            return Err(format!("{NEG}: too few arguments"));
        }
        self.entree = if let Some(reste) = self.entree.strip_prefix('-') {
            format!("+{reste}")
        } else if let Some(reste) = self.entree.strip_prefix('+') {
            format!("-{reste}")
        } else {
            format!("-{}", self.entree)
        };
        Ok(())
    }

    /// Collage : on ne garde que chiffres, point et signes.
    pub fn coller(&mut self, texte: &str) {
        self.effacer_messages();
        let filtre: String = texte
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
            .collect();
        if filtre.is_empty() {
            return;
        }
        if !self.saisie_visible {
            self.saisie_visible = true;
            self.entree.clear();
        }
        self.entree.push_str(&filtre);
    }

    /// UNDO a un effet : abandon de la saisie, ou instantané disponible.
    pub fn annulation_possible(&self) -> bool {
        self.saisie_visible || self.calc.profondeur_annulation() > 0
    }

    /* ------------------------ Utilitaires ------------------------ */

    fn fermer_saisie(&mut self) {
        self.saisie_visible = false;
        self.entree.clear();
    }

    fn effacer_messages(&mut self) {
        self.erreur.clear();
        self.message.clear();
    }

    /// Place une erreur ; la saisie en cours est abandonnée.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.fermer_saisie();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taper(app: &mut AppCalc, touches: &[&str]) {
        for t in touches {
            app.touche(t);
        }
    }

    fn pile(app: &AppCalc) -> Vec<String> {
        app.calc.pile_texte()
    }

    #[test]
    fn saisie_puis_entree() {
        let mut app = AppCalc::default();
        assert!(!app.saisie_visible);
        taper(&mut app, &["1", ".", "2"]);
        assert!(app.saisie_visible);
        taper(&mut app, &["9", RETOUR]);
        assert_eq!(app.entree, "1.2");
        taper(&mut app, &[ENTREE]);
        assert_eq!(pile(&app), ["1.2"]);
        assert!(!app.saisie_visible);
        // Entrée explicite : annulable
        assert_eq!(app.calc.profondeur_annulation(), 1);
    }

    #[test]
    fn entree_implicite_avant_commande() {
        let mut app = AppCalc::default();
        taper(&mut app, &["9", "@"]);
        assert_eq!(pile(&app), ["3"]);
        // saisie implicite : pas d’instantané propre, seul SQRT en prend un
        assert_eq!(app.calc.profondeur_annulation(), 1);
        taper(&mut app, &["z"]);
        assert_eq!(pile(&app), ["9"]);
        assert_eq!(app.calc.profondeur_annulation(), 0);
    }

    #[test]
    fn commandes_au_clavier() {
        let mut app = AppCalc::default();
        taper(&mut app, &["2", "7", ENTREE, "3", "/"]);
        assert_eq!(pile(&app), ["9"]);
        taper(&mut app, &["n"]);
        assert_eq!(pile(&app), ["-9"]);
        assert_eq!(app.calc.historique(), ["27 / 3 = 9"]);
    }

    #[test]
    fn sans_saisie_entree_duplique_retour_jette() {
        let mut app = AppCalc::default();
        taper(&mut app, &["1", "2", "3", ENTREE, ENTREE]);
        assert_eq!(pile(&app), ["123", "123"]);
        taper(&mut app, &[RETOUR, RETOUR]);
        assert!(app.calc.est_vide());
        taper(&mut app, &[RETOUR]);
        assert_eq!(app.erreur, "DROP: stack is empty");
    }

    #[test]
    fn signe_pendant_la_saisie() {
        let mut app = AppCalc::default();
        taper(&mut app, &["1", ".", "2", "n"]);
        assert_eq!(app.entree, "-1.2");
        taper(&mut app, &["n"]);
        assert_eq!(app.entree, "+1.2");
        taper(&mut app, &[ENTREE]);
        assert_eq!(pile(&app), ["1.2"]);
    }

    #[test]
    fn signe_sans_chiffre() {
        let mut app = AppCalc::default();
        app.coller("+");
        app.touche(RETOUR);
        assert!(app.saisie_visible);
        app.touche("n");
        assert_eq!(app.erreur, "NEG: too few arguments");
        assert!(!app.saisie_visible);
    }

    #[test]
    fn annuler_pendant_la_saisie() {
        let mut app = AppCalc::default();
        taper(&mut app, &["4", ENTREE, "5", "z"]);
        assert_eq!(app.message, "undo");
        assert!(!app.saisie_visible);
        assert_eq!(pile(&app), ["4"]);
    }

    #[test]
    fn erreur_prefixee_et_saisie_refermee() {
        let mut app = AppCalc::default();
        taper(&mut app, &["8", ENTREE, "0", "/"]);
        assert_eq!(app.erreur, "DIV: divide by zero");
        // la saisie implicite est entrée avant le refus
        assert_eq!(pile(&app), ["8", "0"]);
        // la touche suivante efface l’erreur
        taper(&mut app, &["z"]);
        assert!(app.erreur.is_empty());
    }

    #[test]
    fn nombre_invalide() {
        let mut app = AppCalc::default();
        app.coller("1.2.3");
        app.touche(ENTREE);
        assert_eq!(app.erreur, "invalid number");
        assert!(app.calc.est_vide());
        assert!(!app.saisie_visible);
    }

    #[test]
    fn collage_filtre() {
        let mut app = AppCalc::default();
        app.coller("prix : 1 234,50 €");
        assert!(app.saisie_visible);
        assert_eq!(app.entree, "123450");

        let mut app = AppCalc::default();
        app.coller("abc");
        assert!(!app.saisie_visible);

        let mut app = AppCalc::default();
        taper(&mut app, &["1"]);
        app.coller("-2.5");
        assert_eq!(app.entree, "1-2.5");
    }

    #[test]
    fn yank_vers_presse_papiers() {
        let mut app = AppCalc::default();
        taper(&mut app, &["4", "2", "y"]);
        assert_eq!(app.presse_papiers.as_deref(), Some("42"));
        assert_eq!(app.message, "yanked to clipboard");
        assert_eq!(pile(&app), ["42"]);
    }

    #[test]
    fn boutons_de_commande() {
        let mut app = AppCalc::default();
        app.commande("PI");
        assert_eq!(pile(&app), ["3.1415926536"]);
        app.commande("CLEAR");
        assert!(app.calc.est_vide());
        app.commande("UNDO");
        assert_eq!(app.message, "undo");
        assert_eq!(pile(&app), ["3.1415926536"]);
    }

    #[test]
    fn bouton_undo_actif_seulement_si_utile() {
        let mut app = AppCalc::default();
        assert!(!app.annulation_possible());
        taper(&mut app, &["7"]);
        assert!(app.annulation_possible());
        taper(&mut app, &[ENTREE]);
        assert!(app.annulation_possible());
        taper(&mut app, &["z"]);
        assert!(!app.annulation_possible());
    }

    #[test]
    fn touche_echap_efface() {
        let mut app = AppCalc::default();
        taper(&mut app, &["1", ENTREE, "2", "esc"]);
        assert!(app.calc.est_vide());
        assert!(!app.saisie_visible);
    }
}
