// src/noyau/virgule_fixe.rs
//
// Noyaux en virgule fixe (entiers “scalés” ×10^chiffres), sans flottants.
// - π      : Machin, plus grande précision en cache
// - √      : Newton sur entier, plancher exact
// - ln     : réduction x = m·2^k (m ∈ [1/2, 2]) + série atanh
// - exp    : réduction t/2^r + Taylor + r mises au carré
//
// Chaque noyau calcule avec des chiffres de garde puis les retire :
// le résultat est exact à une ou deux unités près sur la dernière décimale demandée.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::sync::{Mutex, OnceLock};

/// Chiffres de garde internes aux séries.
const GARDE_SERIE: u32 = 10;

pub fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// r -> entier “scalé” = r × 10^chiffres, tronqué vers zéro.
fn rationnel_scale(r: &BigRational, chiffres: u32) -> BigInt {
    (r.numer() * pow10(chiffres)) / r.denom()
}

/* ------------------------ π (Machin) + cache ------------------------ */

/// arctan(1/q) × scale, série alternée sur les puissances impaires de 1/q.
fn arctan_inverse_scale(q: u32, scale: &BigInt) -> BigInt {
    let q2 = q * q;
    // scale / q^(2k+1)
    let mut puissance = scale / q;
    let mut somme = puissance.clone();

    let mut k: u32 = 1;
    while !puissance.is_zero() {
        puissance /= q2;
        let terme = &puissance / (2 * k + 1);
        if k % 2 == 1 {
            somme -= terme;
        } else {
            somme += terme;
        }
        k += 1;
    }
    somme
}

/// Machin : π = 16·atan(1/5) - 4·atan(1/239), tronqué à `chiffres` décimales.
fn pi_machin(chiffres: u32) -> BigInt {
    let scale = pow10(chiffres + GARDE_SERIE);
    let pi = arctan_inverse_scale(5, &scale) * 16u32 - arctan_inverse_scale(239, &scale) * 4u32;
    pi / pow10(GARDE_SERIE)
}

/// Un seul π en cache : celui de la plus grande précision demandée.
/// Une précision inférieure s’en déduit par troncature.
static PI_CACHE: OnceLock<Mutex<Option<(u32, BigInt)>>> = OnceLock::new();

/// π × 10^chiffres (tronqué).
pub fn pi_scale(chiffres: u32) -> BigInt {
    let cache = PI_CACHE.get_or_init(|| Mutex::new(None));
    // un cache empoisonné reste cohérent : on n’y range que des valeurs complètes
    let mut garde = cache.lock().unwrap_or_else(|e| e.into_inner());

    match garde.as_ref() {
        Some((connus, pi)) if *connus >= chiffres => pi / pow10(connus - chiffres),
        _ => {
            let pi = pi_machin(chiffres);
            *garde = Some((chiffres, pi.clone()));
            pi
        }
    }
}

/* ------------------------ √ (Newton) ------------------------ */

/// floor( sqrt(r) × 10^chiffres ), r = n/d >= 0.
pub fn racine_scale(r: &BigRational, chiffres: u32) -> BigInt {
    let n = r.numer().clone();
    let d = r.denom().clone();

    if !n.is_positive() {
        return BigInt::zero();
    }

    // y ≈ sqrt(n/d) × 10^chiffres  =>  y^2 ≈ (n × 10^(2·chiffres)) / d
    let target = n * pow10(2 * chiffres);

    // point de départ au-dessus de la racine : Newton décroît alors de façon monotone
    let approx = &target / &d;
    let mut y = BigInt::one() << (approx.bits() / 2 + 1) as usize;

    while !y.is_zero() {
        let q = &target / (&d * &y);
        let y_next: BigInt = (&y + q) >> 1usize;
        if y_next >= y {
            break;
        }
        y = y_next;
    }

    // ajustement final (plancher)
    while (&y + 1u32) * (&y + 1u32) * &d <= target {
        y += 1u32;
    }
    while &y * &y * &d > target {
        y -= 1u32;
    }
    y
}

/* ------------------------ ln (atanh) ------------------------ */

/// atanh(z) scalé, |z| <= 1/3 (z déjà scalé par `scale`).
fn atanh_scale(z: &BigInt, scale: &BigInt) -> BigInt {
    let z2 = (z * z) / scale;
    let mut terme = z.clone();
    let mut somme = z.clone();
    let mut n: u32 = 1;

    loop {
        terme = (&terme * &z2) / scale;
        if terme.is_zero() {
            break;
        }
        n += 2;
        somme += &terme / n;
    }
    somme
}

/// ln(x) × 10^chiffres, x > 0 (l’appelant garantit le domaine).
pub fn ln_scale(x: &BigRational, chiffres: u32) -> BigInt {
    let p = chiffres + GARDE_SERIE;
    let scale = pow10(p);

    // réduction : x = m · 2^k, m ∈ [1/2, 2]
    let mut k: i64 = x.numer().bits() as i64 - x.denom().bits() as i64;
    let deux_k = BigRational::from_integer(BigInt::one() << k.unsigned_abs() as usize);
    let mut m = if k >= 0 { x / &deux_k } else { x * &deux_k };

    let deux = BigRational::from_integer(BigInt::from(2));
    let demi = BigRational::new(BigInt::one(), BigInt::from(2));
    while m > deux {
        m /= &deux;
        k += 1;
    }
    while m < demi {
        m *= &deux;
        k -= 1;
    }

    // ln(m) = 2·atanh((m-1)/(m+1))
    let un = BigRational::one();
    let z = (&m - &un) / (&m + &un);
    let ln_m = atanh_scale(&rationnel_scale(&z, p), &scale) * 2u32;

    // ln(2) = 2·atanh(1/3)
    let ln2 = atanh_scale(&(&scale / 3u32), &scale) * 2u32;

    (ln_m + ln2 * k) / pow10(GARDE_SERIE)
}

/* ------------------------ exp (Taylor) ------------------------ */

/// Nombre de chiffres de la partie entière de exp(t) : ceil(t / ln 10), 0 si t <= 0.
fn chiffres_entiers_exp(t: &BigRational) -> u32 {
    if !t.is_positive() {
        return 0;
    }
    let t = t.to_f64().unwrap_or(f64::MAX);
    (t / std::f64::consts::LN_10).ceil().min(1e6) as u32
}

/// exp(t) × 10^chiffres (t rationnel quelconque, l’appelant borne la taille du résultat).
pub fn exp_scale(t: &BigRational, chiffres: u32) -> BigInt {
    // r mises au carré : |t| / 2^r < 1
    let r = (t.numer().bits() as i64 - t.denom().bits() as i64 + 1).max(0) as u32;

    // chaque mise au carré double l’erreur relative : un chiffre de garde de plus par tranche de 3
    // + les chiffres de la partie entière du résultat (erreur relative -> absolue)
    let p = chiffres + GARDE_SERIE + r / 3 + 1 + chiffres_entiers_exp(t);
    let scale = pow10(p);

    let reduit = t / BigRational::from_integer(BigInt::one() << r as usize);
    let u = rationnel_scale(&reduit, p);

    let mut somme = scale.clone();
    let mut terme = scale.clone();
    let mut n: u32 = 1;
    loop {
        terme = (&terme * &u) / &scale / n;
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        n += 1;
    }

    for _ in 0..r {
        somme = (&somme * &somme) / &scale;
    }

    somme / pow10(p - chiffres)
}
