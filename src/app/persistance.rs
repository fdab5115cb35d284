// src/app/persistance.rs
//
// Sauvegarde de la session (pile + historique) dans le stockage eframe.
// - natif : fichier dans le dossier de données de l’application
// - web   : localStorage
//
// Contrats :
// - Enregistrement versionné : une autre version est ignorée (session vierge).
// - Les valeurs voyagent en texte canonique (aller-retour sans perte).
// - Une valeur illisible rejette toute la pile sauvegardée, jamais à moitié.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::noyau::Calculatrice;

/// Version courante du format.
pub const VERSION: u32 = 1;

/// Clé dans le stockage eframe.
pub const CLE: &str = "calculatrice_rpn";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtatSauvegarde {
    pub version: u32,
    pub pile: Vec<String>,
    pub historique: Vec<String>,
}

impl EtatSauvegarde {
    pub fn depuis(calc: &Calculatrice) -> Self {
        Self {
            version: VERSION,
            pile: calc.pile_texte(),
            historique: calc.historique().to_vec(),
        }
    }

    /// Recharge pile + historique dans `calc` (bornés aux réglages de `calc`).
    pub fn appliquer(mut self, calc: &mut Calculatrice) -> Result<(), String> {
        if self.version != VERSION {
            return Err(format!("version {} ignorée (attendue {VERSION})", self.version));
        }

        let reglages = calc.reglages();
        garder_fin(&mut self.pile, reglages.pile_max);
        garder_fin(&mut self.historique, reglages.historique_max);

        calc.definir_pile(&self.pile)
            .map_err(|e| format!("pile sauvegardée : {e}"))?;
        calc.definir_historique(self.historique);
        Ok(())
    }
}

fn garder_fin(v: &mut Vec<String>, max: usize) {
    if v.len() > max {
        v.drain(..v.len() - max);
    }
}

/// Lit la session sauvegardée et l’applique ; sans stockage ou sans session : rien.
pub fn charger(stockage: Option<&dyn eframe::Storage>, calc: &mut Calculatrice) {
    let Some(stockage) = stockage else {
        return;
    };
    let Some(etat) = eframe::get_value::<EtatSauvegarde>(stockage, CLE) else {
        return;
    };

    match etat.appliquer(calc) {
        Ok(()) => info!(
            "session rechargée : {} valeur(s), {} ligne(s) d’historique",
            calc.len(),
            calc.historique().len()
        ),
        Err(e) => warn!("session ignorée : {e}"),
    }
}

pub fn sauver(stockage: &mut dyn eframe::Storage, calc: &Calculatrice) {
    let etat = EtatSauvegarde::depuis(calc);
    eframe::set_value(stockage, CLE, &etat);
    info!("session sauvegardée : {} valeur(s)", etat.pile.len());
}
