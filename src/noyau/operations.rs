// src/noyau/operations.rs
//
// Opérations numériques pures sur Decimal.
// - Exactes : addition, soustraction, multiplication, négation, modulo, factorielle,
//   puissance entière.
// - Approchées (paramètre `chiffres`) : division, inverse, ln, log, racine, puissance
//   réelle. L’appelant passe la précision de travail + garde, puis normalise.
// - Échecs documentés : renvoyés en ErreurCalcul::OperandesInvalides, jamais de panic.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use super::decimal::Decimal;
use super::erreur::{ErreurCalcul, ResultatCalcul};
use super::virgule_fixe::{exp_scale, ln_scale, pi_scale, pow10, racine_scale};

/// Chiffres de garde ajoutés à la précision de travail pour les opérations approchées.
pub const GARDE: u32 = 10;

/// Borne haute de la factorielle.
pub const FACTORIELLE_MAX: i64 = 100;

/// Garde-fou : ordre de grandeur maximal d’un résultat (10^1000).
const ORDRE_MAX: f64 = 1000.0;

/// Au-delà de cette échelle, la puissance entière exacte serait trop coûteuse.
const ECHELLE_EXACTE_MAX: u64 = 10_000;

pub const DIVISION_PAR_ZERO: &str = "divide by zero";
pub const PAS_POSITIF: &str = "not positive";
pub const PAS_ENTIER_POSITIF: &str = "not a positive int";
pub const TROP_GRAND: &str = "too large";
pub const PAS_REEL: &str = "not a real number";

/* ------------------------ Constantes ------------------------ */

pub fn pi(chiffres: u32) -> Decimal {
    Decimal::nouveau(pi_scale(chiffres), chiffres)
}

pub fn demi() -> Decimal {
    Decimal::nouveau(BigInt::from(5), 1)
}

pub fn un() -> Decimal {
    Decimal::un()
}

/// ln(10) tronqué à `chiffres` décimales.
pub fn ln10(chiffres: u32) -> Decimal {
    Decimal::nouveau(ln_scale(&BigRational::from_integer(BigInt::from(10)), chiffres), chiffres)
}

/* ------------------------ Exactes ------------------------ */

pub fn ajouter(a: &Decimal, b: &Decimal) -> Decimal {
    a + b
}

pub fn soustraire(a: &Decimal, b: &Decimal) -> Decimal {
    a - b
}

pub fn multiplier(a: &Decimal, b: &Decimal) -> Decimal {
    a * b
}

pub fn negatif(a: &Decimal) -> Decimal {
    -a
}

/// Reste tronqué : le signe suit le dividende (5 mod 3 = 2, -5 mod 3 = -2).
pub fn modulo(a: &Decimal, b: &Decimal) -> ResultatCalcul<Decimal> {
    a.reste(b)
        .ok_or_else(|| ErreurCalcul::invalide(DIVISION_PAR_ZERO))
}

/// n! par produit entier exact de 1..n, n entier dans 0..=100.
pub fn factorielle(a: &Decimal) -> ResultatCalcul<Decimal> {
    if a.est_negatif() || !a.est_entier() {
        return Err(ErreurCalcul::invalide(PAS_ENTIER_POSITIF));
    }
    let n = match a.en_i64() {
        Some(n) if n <= FACTORIELLE_MAX => n,
        _ => return Err(ErreurCalcul::invalide(TROP_GRAND)),
    };

    let mut acc = BigInt::one();
    for ii in 2..=n {
        acc *= ii;
    }
    Ok(Decimal::from(acc))
}

/* ------------------------ Approchées ------------------------ */

pub fn diviser(a: &Decimal, b: &Decimal, chiffres: u32) -> ResultatCalcul<Decimal> {
    if b.est_zero() {
        return Err(ErreurCalcul::invalide(DIVISION_PAR_ZERO));
    }
    let q = a.en_rationnel() / b.en_rationnel();
    Ok(Decimal::depuis_rationnel(&q, chiffres))
}

pub fn inverse(a: &Decimal, chiffres: u32) -> ResultatCalcul<Decimal> {
    diviser(&un(), a, chiffres)
}

pub fn ln(a: &Decimal, chiffres: u32) -> ResultatCalcul<Decimal> {
    if !a.est_positif() {
        return Err(ErreurCalcul::invalide(PAS_POSITIF));
    }
    Ok(Decimal::nouveau(ln_scale(&a.en_rationnel(), chiffres), chiffres))
}

/// log10(a) = ln(a) / ln(10), les deux calculés avec la même garde.
pub fn log10(a: &Decimal, chiffres: u32) -> ResultatCalcul<Decimal> {
    if !a.est_positif() {
        return Err(ErreurCalcul::invalide(PAS_POSITIF));
    }
    let c = chiffres + GARDE;
    let num = BigRational::new(ln_scale(&a.en_rationnel(), c), pow10(c));
    Ok(Decimal::depuis_rationnel(&(num / ln10(c).en_rationnel()), chiffres))
}

pub fn racine(a: &Decimal, chiffres: u32) -> ResultatCalcul<Decimal> {
    if a.est_negatif() {
        return Err(ErreurCalcul::invalide(PAS_POSITIF));
    }
    // plancher sur la garde, puis arrondi : √9 = 3 exactement
    let brut = Decimal::nouveau(racine_scale(&a.en_rationnel(), chiffres + GARDE), chiffres + GARDE);
    Ok(brut.arrondir(chiffres))
}

/// Estimation de log10(|x^y|), x ≠ 0 et |x| ≠ 1.
fn ordre_de_grandeur(base: &Decimal, y: &Decimal) -> f64 {
    y.en_f64_approx() * base.log10_approx()
}

/// Raison d’échec de x^y, ou None si le résultat est représentable.
pub fn puissance_impossible(x: &Decimal, y: &Decimal) -> Option<&'static str> {
    if y.est_zero() {
        return None;
    }
    if x.est_zero() {
        return y.est_negatif().then_some(DIVISION_PAR_ZERO);
    }
    if x.est_negatif() && !y.est_entier() {
        return Some(PAS_REEL);
    }
    let base = x.abs();
    if base == un() {
        return None;
    }
    let ordre = ordre_de_grandeur(&base, y);
    if ordre.is_nan() || ordre > ORDRE_MAX {
        return Some(TROP_GRAND);
    }
    None
}

/// x^y.
/// - y = 0 : 1 (y compris 0^0)
/// - y entier : élévation exacte (inverse pour y < 0)
/// - y = 1/2 : racine
/// - sinon : exp(y · ln x), base positive uniquement
pub fn puissance(x: &Decimal, y: &Decimal, chiffres: u32) -> ResultatCalcul<Decimal> {
    if let Some(raison) = puissance_impossible(x, y) {
        return Err(ErreurCalcul::invalide(raison));
    }
    if y.est_zero() {
        return Ok(un());
    }
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    if *y == demi() {
        return racine(x, chiffres);
    }

    // signe : base négative => exposant entier (vérifié plus haut)
    let impair = y.est_entier() && !(y.mantisse() % 2u32).is_zero();
    let resultat_negatif = x.est_negatif() && impair;
    let base = x.abs();

    // sous la précision demandée : zéro, sans dérouler la série
    if base != un() && ordre_de_grandeur(&base, y) < -f64::from(chiffres + 1) {
        return Ok(Decimal::zero());
    }

    let exposant_exact = y
        .en_i64()
        .and_then(|n| u32::try_from(n.unsigned_abs()).ok().map(|m| (n < 0, m)))
        .filter(|(_, m)| u64::from(base.echelle()) * u64::from(*m) <= ECHELLE_EXACTE_MAX);

    let absolu = match exposant_exact {
        Some((negatif, m)) => {
            let exact = puissance_entiere(&base, m);
            if negatif {
                diviser(&un(), &exact, chiffres)?
            } else {
                exact
            }
        }
        None => puissance_reelle(&base, y, chiffres),
    };

    Ok(if resultat_negatif { -absolu } else { absolu })
}

/// base^n exact (mantisse^n, échelle×n).
fn puissance_entiere(base: &Decimal, n: u32) -> Decimal {
    Decimal::nouveau(base.mantisse().pow(n), base.echelle() * n)
}

/// exp(y · ln(base)), base > 0.
fn puissance_reelle(base: &Decimal, y: &Decimal, chiffres: u32) -> Decimal {
    // l’erreur sur ln(base) est multipliée par |y|, puis par la taille du résultat
    let marge = y.abs().log10_approx().max(0.0).ceil().to_u32().unwrap_or(0);
    let entiers = ordre_de_grandeur(base, y).max(0.0).ceil().to_u32().unwrap_or(0);
    let c = chiffres + GARDE + marge + entiers;

    let ln_base = BigRational::new(ln_scale(&base.en_rationnel(), c), pow10(c));
    let t = y.en_rationnel() * ln_base;
    Decimal::nouveau(exp_scale(&t, chiffres), chiffres)
}
