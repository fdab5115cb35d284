// src/noyau/decimal.rs
//
// Décimal signé à précision bornée : valeur = mantisse × 10^(-echelle).
// - Forme canonique : pas de zéros finaux dans la partie fractionnaire, zéro = (0, 0).
//   => l’égalité dérivée est l’égalité décimale exacte.
// - Ordre : comparaison exacte après alignement des échelles (jamais de flottants).
// - Immuable : toutes les opérations renvoient une nouvelle valeur.
// - Arrondi : demi-unité loin de zéro (5.45 -> 5.5, -5.45 -> -5.5).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use super::erreur::ErreurCalcul;
use super::virgule_fixe::pow10;

/// Garde-fou : exposant décimal accepté à la lecture ("1e10000").
const EXPOSANT_MAX: i64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantisse: BigInt,
    echelle: u32,
}

impl Default for Decimal {
    fn default() -> Self {
        Decimal::zero()
    }
}

/* ------------------------ Construction ------------------------ */

impl Decimal {
    /// Construit mantisse × 10^(-echelle), remis en forme canonique.
    pub fn nouveau(mantisse: BigInt, echelle: u32) -> Self {
        if mantisse.is_zero() {
            return Decimal::zero();
        }

        let dix = BigInt::from(10u32);
        let mut m = mantisse;
        let mut e = echelle;
        while e > 0 && (&m % &dix).is_zero() {
            m /= &dix;
            e -= 1;
        }
        Decimal {
            mantisse: m,
            echelle: e,
        }
    }

    pub fn zero() -> Self {
        Decimal {
            mantisse: BigInt::zero(),
            echelle: 0,
        }
    }

    pub fn un() -> Self {
        Decimal::from(1)
    }

    /// Rationnel -> décimal arrondi à `chiffres` décimales.
    pub fn depuis_rationnel(r: &BigRational, chiffres: u32) -> Self {
        let scaled = r.numer() * pow10(chiffres);
        let denom = r.denom();

        let mut q = &scaled / denom;
        let reste = &scaled % denom;
        if reste.abs() * 2u32 >= denom.abs() {
            if scaled.is_negative() {
                q -= 1u32;
            } else {
                q += 1u32;
            }
        }
        Decimal::nouveau(q, chiffres)
    }

    pub fn en_rationnel(&self) -> BigRational {
        BigRational::new(self.mantisse.clone(), pow10(self.echelle))
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Decimal::nouveau(BigInt::from(n), 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Decimal::nouveau(n, 0)
    }
}

/* ------------------------ Accès / prédicats ------------------------ */

impl Decimal {
    pub fn mantisse(&self) -> &BigInt {
        &self.mantisse
    }

    pub fn echelle(&self) -> u32 {
        self.echelle
    }

    pub fn est_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn est_negatif(&self) -> bool {
        self.mantisse.is_negative()
    }

    pub fn est_positif(&self) -> bool {
        self.mantisse.is_positive()
    }

    /// Exact (forme canonique => un entier a une échelle nulle).
    pub fn est_entier(&self) -> bool {
        self.echelle == 0
    }

    pub fn abs(&self) -> Decimal {
        Decimal {
            mantisse: self.mantisse.abs(),
            echelle: self.echelle,
        }
    }

    /// Valeur entière si elle tient dans un i64, sinon None.
    pub fn en_i64(&self) -> Option<i64> {
        if !self.est_entier() {
            return None;
        }
        self.mantisse.to_i64()
    }

    /// Estimation de log10(|x|) pour les garde-fous (jamais pour un résultat).
    pub fn log10_approx(&self) -> f64 {
        if self.est_zero() {
            return f64::NEG_INFINITY;
        }
        let chiffres = self.mantisse.abs().to_string();
        let pris = chiffres.len().min(17);
        let tete: f64 = chiffres[..pris].parse().unwrap_or(1.0);
        tete.log10() + (chiffres.len() - pris) as f64 - self.echelle as f64
    }

    /// Approximation flottante (garde-fous uniquement).
    pub fn en_f64_approx(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

/* ------------------------ Arrondi / normalisation ------------------------ */

impl Decimal {
    /// Arrondi à `chiffres` décimales, demi-unité loin de zéro.
    pub fn arrondir(&self, chiffres: u32) -> Decimal {
        if self.echelle <= chiffres {
            return self.clone();
        }

        let q = pow10(self.echelle - chiffres);
        let mut quotient = &self.mantisse / &q;
        let reste = &self.mantisse % &q;
        if reste.abs() * 2u32 >= q {
            if self.est_negatif() {
                quotient -= 1u32;
            } else {
                quotient += 1u32;
            }
        }
        Decimal::nouveau(quotient, chiffres)
    }

    /// Distance à l’entier le plus proche strictement sous `epsilon`.
    pub fn est_presque_entier(&self, epsilon: &Decimal) -> bool {
        let entier = self.arrondir(0);
        (self - &entier).abs() < *epsilon
    }

    /// Arrondi à la précision de travail, puis aimantation vers l’entier le plus proche.
    /// Idempotente.
    pub fn normaliser(&self, precision: u32, epsilon: &Decimal) -> Decimal {
        let x = self.arrondir(precision);
        if x.est_presque_entier(epsilon) {
            x.arrondir(0)
        } else {
            x
        }
    }

    /// Reste tronqué (signe du dividende). None si diviseur nul.
    pub fn reste(&self, diviseur: &Decimal) -> Option<Decimal> {
        if diviseur.est_zero() {
            return None;
        }
        let (a, b, e) = aligner(self, diviseur);
        Some(Decimal::nouveau(a % b, e))
    }
}

/// Ramène deux décimaux à la même échelle : (mantisse_a, mantisse_b, echelle).
fn aligner(a: &Decimal, b: &Decimal) -> (BigInt, BigInt, u32) {
    match a.echelle.cmp(&b.echelle) {
        Ordering::Equal => (a.mantisse.clone(), b.mantisse.clone(), a.echelle),
        Ordering::Less => (
            &a.mantisse * pow10(b.echelle - a.echelle),
            b.mantisse.clone(),
            b.echelle,
        ),
        Ordering::Greater => (
            a.mantisse.clone(),
            &b.mantisse * pow10(a.echelle - b.echelle),
            a.echelle,
        ),
    }
}

/* ------------------------ Ordre ------------------------ */

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = aligner(self, other);
        a.cmp(&b)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/* ------------------------ Arithmétique exacte ------------------------ */

impl Add for &Decimal {
    type Output = Decimal;
    fn add(self, rhs: &Decimal) -> Decimal {
        let (a, b, e) = aligner(self, rhs);
        Decimal::nouveau(a + b, e)
    }
}

impl Sub for &Decimal {
    type Output = Decimal;
    fn sub(self, rhs: &Decimal) -> Decimal {
        let (a, b, e) = aligner(self, rhs);
        Decimal::nouveau(a - b, e)
    }
}

impl Mul for &Decimal {
    type Output = Decimal;
    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal::nouveau(&self.mantisse * &rhs.mantisse, self.echelle + rhs.echelle)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        Decimal {
            mantisse: -&self.mantisse,
            echelle: self.echelle,
        }
    }
}

impl Add for Decimal {
    type Output = Decimal;
    fn add(self, rhs: Decimal) -> Decimal {
        &self + &rhs
    }
}

impl Sub for Decimal {
    type Output = Decimal;
    fn sub(self, rhs: Decimal) -> Decimal {
        &self - &rhs
    }
}

impl Mul for Decimal {
    type Output = Decimal;
    fn mul(self, rhs: Decimal) -> Decimal {
        &self * &rhs
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        -&self
    }
}

/* ------------------------ Texte ------------------------ */

/// Forme canonique : "579", "0.5", "-3", "3.1415926536" (jamais d’exposant, jamais "-0").
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chiffres = self.mantisse.abs().to_string();
        let e = self.echelle as usize;

        let texte = if e == 0 {
            chiffres
        } else if chiffres.len() > e {
            let (ent, frac) = chiffres.split_at(chiffres.len() - e);
            format!("{ent}.{frac}")
        } else {
            format!("0.{}{chiffres}", "0".repeat(e - chiffres.len()))
        };

        if self.est_negatif() {
            write!(f, "-{texte}")
        } else {
            f.write_str(&texte)
        }
    }
}

/// Lecture : [+-]chiffres[.chiffres][(e|E)[+-]chiffres]. ".5" et "5." acceptés.
impl FromStr for Decimal {
    type Err = ErreurCalcul;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalide = || ErreurCalcul::NombreInvalide(s.to_string());

        let t = s.trim();
        let (negatif, reste) = match t.as_bytes().first() {
            Some(b'-') => (true, &t[1..]),
            Some(b'+') => (false, &t[1..]),
            _ => (false, t),
        };

        let (corps, exposant) = match reste.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&reste[..i], Some(&reste[i + 1..])),
            None => (reste, None),
        };

        let (ent, frac) = corps.split_once('.').unwrap_or((corps, ""));
        if ent.is_empty() && frac.is_empty() {
            return Err(invalide());
        }
        let que_des_chiffres = |x: &str| x.bytes().all(|c| c.is_ascii_digit());
        if !que_des_chiffres(ent) || !que_des_chiffres(frac) {
            return Err(invalide());
        }

        let exposant: i64 = match exposant {
            Some(e) => e.parse().map_err(|_| invalide())?,
            None => 0,
        };
        if exposant.abs() > EXPOSANT_MAX {
            return Err(invalide());
        }

        let mut mantisse =
            BigInt::parse_bytes(format!("{ent}{frac}").as_bytes(), 10).ok_or_else(invalide)?;
        if negatif {
            mantisse = -mantisse;
        }

        let echelle = frac.len() as i64 - exposant;
        if echelle < 0 {
            mantisse *= pow10((-echelle) as u32);
            Ok(Decimal::nouveau(mantisse, 0))
        } else {
            let echelle = u32::try_from(echelle).map_err(|_| invalide())?;
            Ok(Decimal::nouveau(mantisse, echelle))
        }
    }
}

/// Raccourci interne : 10^-n.
pub fn puissance_dix_negative(n: u32) -> Decimal {
    Decimal::nouveau(BigInt::one(), n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn eps() -> Decimal {
        d("0.000001")
    }

    #[test]
    fn lecture_et_forme_canonique() {
        assert_eq!(d("123").to_string(), "123");
        assert_eq!(d("1.50").to_string(), "1.5");
        assert_eq!(d("-0.0").to_string(), "0");
        assert_eq!(d(".5").to_string(), "0.5");
        assert_eq!(d("5.").to_string(), "5");
        assert_eq!(d("+1.2").to_string(), "1.2");
        assert_eq!(d("1.5e3").to_string(), "1500");
        assert_eq!(d("25E-4").to_string(), "0.0025");
        assert_eq!(d("-0.000123").to_string(), "-0.000123");
    }

    #[test]
    fn lecture_refuse_les_litteraux_invalides() {
        for s in ["", "-", ".", "1.2.3", "abc", "1e", "1e99999", "12a", "--1", "1 2"] {
            assert!(s.parse::<Decimal>().is_err(), "s={s:?}");
        }
        assert_eq!(
            "abc".parse::<Decimal>().unwrap_err().to_string(),
            "invalid number"
        );
    }

    #[test]
    fn egalite_et_ordre_exacts() {
        assert_eq!(d("1.0"), d("1"));
        assert!(d("0.1") < d("0.10000000000000000001"));
        assert!(d("-2") < d("-1.5"));
        assert_eq!(d("2.50").cmp(&d("2.5")), Ordering::Equal);
    }

    #[test]
    fn arithmetique_exacte() {
        assert_eq!(d("0.1") + d("0.2"), d("0.3"));
        assert_eq!(d("5") - d("7.25"), d("-2.25"));
        assert_eq!(d("1.5") * d("-4"), d("-6"));
        assert_eq!(-d("3"), d("-3"));
    }

    #[test]
    fn arrondi_demi_loin_de_zero() {
        assert_eq!(d("5.45").arrondir(1), d("5.5"));
        assert_eq!(d("-5.45").arrondir(1), d("-5.5"));
        assert_eq!(d("5.44").arrondir(1), d("5.4"));
        assert_eq!(d("2.5").arrondir(0), d("3"));
        assert_eq!(d("1.25").arrondir(5), d("1.25"));
    }

    #[test]
    fn depuis_rationnel_arrondit() {
        let deux_tiers = BigRational::new(BigInt::from(2), BigInt::from(3));
        assert_eq!(Decimal::depuis_rationnel(&deux_tiers, 4), d("0.6667"));
        assert_eq!(Decimal::depuis_rationnel(&-deux_tiers, 4), d("-0.6667"));
    }

    #[test]
    fn normalisation_aimante_les_presque_entiers() {
        assert_eq!(d("1.00000001").normaliser(10, &eps()), d("1"));
        assert_eq!(d("-1.00000001").normaliser(10, &eps()), d("-1"));
        assert_eq!(d("3.14159").normaliser(10, &eps()), d("3.14159"));
        assert_eq!(d("0.99999999999").normaliser(10, &eps()), d("1"));
        assert_eq!(d("1.1").normaliser(10, &eps()), d("1.1"));
    }

    #[test]
    fn presque_entier() {
        assert!(d("42").est_presque_entier(&eps()));
        assert!(d("1.00000001").est_presque_entier(&eps()));
        assert!(!d("3.14159").est_presque_entier(&eps()));
    }

    #[test]
    fn reste_tronque() {
        assert_eq!(d("5").reste(&d("3")), Some(d("2")));
        assert_eq!(d("-5").reste(&d("3")), Some(d("-2")));
        assert_eq!(d("5.5").reste(&d("2")), Some(d("1.5")));
        assert_eq!(d("5").reste(&Decimal::zero()), None);
    }

    #[test]
    fn estimation_log10() {
        assert!((d("1000").log10_approx() - 3.0).abs() < 1e-9);
        assert!((d("0.01").log10_approx() + 2.0).abs() < 1e-9);
    }

    fn decimal_arbitraire() -> impl Strategy<Value = Decimal> {
        (any::<i64>(), 0u32..20).prop_map(|(m, e)| Decimal::nouveau(BigInt::from(m), e))
    }

    proptest! {
        #[test]
        fn normalisation_idempotente(x in decimal_arbitraire()) {
            let une_fois = x.normaliser(10, &eps());
            prop_assert_eq!(une_fois.normaliser(10, &eps()), une_fois);
        }

        #[test]
        fn texte_canonique_sans_perte(x in decimal_arbitraire()) {
            let relu: Decimal = x.to_string().parse().unwrap();
            prop_assert_eq!(relu, x);
        }
    }
}
