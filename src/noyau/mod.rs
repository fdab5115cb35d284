//! Noyau RPN décimal
//!
//! Organisation interne :
//! - decimal.rs      : Decimal (mantisse BigInt × 10^-échelle), parsing, arrondi, normalisation
//! - virgule_fixe.rs : noyaux entiers scalés (π, √, ln, exp) + cache π
//! - operations.rs   : opérations numériques pures (exactes / approchées)
//! - catalogue.rs    : table statique des commandes + validateurs + gabarits d’historique
//! - calculatrice.rs : pile, historique, annulation, exécution atomique
//! - reglages.rs     : bornes, précision, epsilon (+ surcharges par environnement)
//! - erreur.rs       : erreurs récupérables

pub mod calculatrice;
pub mod catalogue;
pub mod decimal;
pub mod erreur;
pub mod operations;
pub mod reglages;
pub mod virgule_fixe;

#[cfg(test)]
mod tests_commandes;

// API publique minimale
pub use calculatrice::Calculatrice;
pub use decimal::Decimal;
pub use erreur::ErreurCalcul;
pub use reglages::Reglages;
