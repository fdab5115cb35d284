// src/noyau/reglages.rs
//
// Réglages fixés à la construction de la calculatrice (jamais modifiés ensuite).
// Surcharges possibles par variables d’environnement :
//   CALC_RPN_PILE_MAX, CALC_RPN_HISTORIQUE_MAX, CALC_RPN_ANNULATION_MAX,
//   CALC_RPN_PRECISION, CALC_RPN_EPSILON
// Valeur illisible => ignorée (journalisée), valeur hors bornes => ramenée dans les bornes.

use log::warn;

use super::decimal::{puissance_dix_negative, Decimal};

/// Taille max de la pile / de l’historique / des instantanés d’annulation.
const TAILLE_DEFAUT: usize = 50;

/// Décimales de travail par défaut.
const PRECISION_DEFAUT: u32 = 10;

/// Garde-fou : au-delà, les séries deviennent coûteuses pour rien.
const PRECISION_MAX: u32 = 50;

/// Lignes de pile visibles (1: en bas).
const LIGNES_DEFAUT: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct Reglages {
    pub pile_max: usize,
    pub historique_max: usize,
    pub annulation_max: usize,
    pub precision: u32,
    /// Distance sous laquelle une valeur est aimantée vers l’entier le plus proche.
    pub epsilon: Decimal,
    pub lignes_visibles: usize,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            pile_max: TAILLE_DEFAUT,
            historique_max: TAILLE_DEFAUT,
            annulation_max: TAILLE_DEFAUT,
            precision: PRECISION_DEFAUT,
            epsilon: puissance_dix_negative(6),
            lignes_visibles: LIGNES_DEFAUT,
        }
    }
}

impl Reglages {
    /// Défauts + surcharges lues dans l’environnement du processus.
    pub fn depuis_env() -> Self {
        Self::avec_variables(|cle| std::env::var(cle).ok())
    }

    /// Défauts + surcharges fournies par `lire` (nom de variable -> valeur brute).
    pub fn avec_variables(lire: impl Fn(&str) -> Option<String>) -> Self {
        let mut r = Self::default();

        if let Some(n) = lire_valeur::<usize>(&lire, "CALC_RPN_PILE_MAX") {
            r.pile_max = n.max(1);
        }
        if let Some(n) = lire_valeur::<usize>(&lire, "CALC_RPN_HISTORIQUE_MAX") {
            r.historique_max = n.max(1);
        }
        if let Some(n) = lire_valeur::<usize>(&lire, "CALC_RPN_ANNULATION_MAX") {
            r.annulation_max = n.max(1);
        }
        if let Some(p) = lire_valeur::<u32>(&lire, "CALC_RPN_PRECISION") {
            r.precision = p.min(PRECISION_MAX);
        }
        if let Some(e) = lire_valeur::<Decimal>(&lire, "CALC_RPN_EPSILON") {
            if e.est_negatif() {
                warn!("CALC_RPN_EPSILON négatif ignoré : {e}");
            } else {
                r.epsilon = e;
            }
        }

        r
    }
}

fn lire_valeur<T: std::str::FromStr>(
    lire: &impl Fn(&str) -> Option<String>,
    cle: &str,
) -> Option<T> {
    let brut = lire(cle)?;
    match brut.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{cle} illisible, valeur par défaut conservée : {brut:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn avec(paires: &[(&str, &str)]) -> Reglages {
        let env: HashMap<String, String> = paires
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Reglages::avec_variables(|cle| env.get(cle).cloned())
    }

    #[test]
    fn defauts() {
        let r = Reglages::default();
        assert_eq!(r.pile_max, 50);
        assert_eq!(r.historique_max, 50);
        assert_eq!(r.annulation_max, 50);
        assert_eq!(r.precision, 10);
        assert_eq!(r.epsilon, "0.000001".parse().unwrap());
        assert_eq!(r.lignes_visibles, 6);
    }

    #[test]
    fn surcharges_et_bornes() {
        let r = avec(&[
            ("CALC_RPN_PILE_MAX", "8"),
            ("CALC_RPN_HISTORIQUE_MAX", "0"),
            ("CALC_RPN_PRECISION", "500"),
            ("CALC_RPN_EPSILON", "1e-9"),
        ]);
        assert_eq!(r.pile_max, 8);
        assert_eq!(r.historique_max, 1);
        assert_eq!(r.annulation_max, 50);
        assert_eq!(r.precision, 50);
        assert_eq!(r.epsilon, "0.000000001".parse().unwrap());
    }

    #[test]
    fn valeurs_illisibles_ignorees() {
        let r = avec(&[
            ("CALC_RPN_PILE_MAX", "beaucoup"),
            ("CALC_RPN_EPSILON", "-1"),
        ]);
        assert_eq!(r, Reglages::default());
    }
}
