// src/noyau/erreur.rs
//
// Erreurs récupérables du noyau.
// - Le texte affiché (Display) est exactement la raison montrée à l’utilisateur.
// - Aucune de ces erreurs ne modifie l’état de la calculatrice.
// - Commande inconnue = erreur de programmation => panic, pas de variante ici.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErreurCalcul {
    /// Pas assez de valeurs sur la pile pour l’arité de la commande.
    #[error("{0}")]
    OperandesInsuffisantes(&'static str),

    /// Validateur ou opération refusée (division par zéro, factorielle trop grande…).
    #[error("{0}")]
    OperandesInvalides(String),

    /// Littéral illisible (saisie ou état sauvegardé).
    #[error("invalid number")]
    NombreInvalide(String),
}

impl ErreurCalcul {
    pub fn invalide(raison: impl Into<String>) -> Self {
        ErreurCalcul::OperandesInvalides(raison.into())
    }
}

pub type ResultatCalcul<T> = Result<T, ErreurCalcul>;
