// src/noyau/catalogue.rs
//
// Catalogue des commandes (statique, fermé, jamais modifié).
//
// Une commande = nom unique + touche optionnelle + arité (0/1/2 entrées)
//              + nombre de sorties + effet + validateur optionnel + gabarit d’historique.
//
// Effet :
// - Calcul(f) : fonction pure, opérandes (ordre d’entrée RPN) -> valeurs à empiler
// - Effacer / Annuler : agissent sur l’état de la calculatrice (dispatch côté moteur)
//
// Gabarit d’historique : emplacements "{}" remplis dans l’ordre par les opérandes
// (gauche -> droite) puis par les résultats.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::decimal::Decimal;
use super::erreur::ResultatCalcul;
use super::operations::{self as op, DIVISION_PAR_ZERO, PAS_POSITIF};

/// Noms lancés directement par l’interface.
pub const CLEAR: &str = "CLEAR";
pub const DROP: &str = "DROP";
pub const DUP: &str = "DUP";
pub const NEG: &str = "NEG";
pub const UNDO: &str = "UNDO";
pub const YANK: &str = "YANK";

pub const RIEN_A_ANNULER: &str = "nothing to undo";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Zero,
    Un,
    Deux,
}

impl Arite {
    pub fn entrees(self) -> usize {
        match self {
            Arite::Zero => 0,
            Arite::Un => 1,
            Arite::Deux => 2,
        }
    }

    /// Raison renvoyée quand la pile est trop courte.
    pub fn manque(self) -> &'static str {
        match self {
            Arite::Zero => "",
            Arite::Un => "stack is empty",
            Arite::Deux => "too few arguments",
        }
    }
}

/// Opérandes en lecture seule (sommet(s) de pile, ordre d’entrée) + profondeur d’annulation.
pub struct VueValidation<'a> {
    pub operandes: &'a [Decimal],
    pub annulations: usize,
}

pub type Validateur = fn(&VueValidation<'_>) -> Result<(), &'static str>;

/// Opérandes (ordre d’entrée) + chiffres de calcul -> valeurs à empiler.
pub type FnCalcul = fn(&[Decimal], u32) -> ResultatCalcul<Vec<Decimal>>;

#[derive(Clone, Copy)]
pub enum Effet {
    Calcul(FnCalcul),
    Effacer,
    Annuler,
}

#[derive(Clone, Copy)]
pub struct Commande {
    pub nom: &'static str,
    pub touche: Option<&'static str>,
    pub arite: Arite,
    pub sorties: usize,
    pub effet: Effet,
    pub valide: Option<Validateur>,
    pub format: Option<&'static str>,
}

impl std::fmt::Debug for Commande {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commande")
            .field("nom", &self.nom)
            .field("touche", &self.touche)
            .field("arite", &self.arite)
            .field("sorties", &self.sorties)
            .finish()
    }
}

/* ------------------------ La table ------------------------ */

const fn cmd(
    nom: &'static str,
    touche: Option<&'static str>,
    arite: Arite,
    sorties: usize,
    effet: Effet,
) -> Commande {
    Commande {
        nom,
        touche,
        arite,
        sorties,
        effet,
        valide: None,
        format: None,
    }
}

const fn avec(mut c: Commande, valide: Option<Validateur>, format: Option<&'static str>) -> Commande {
    c.valide = valide;
    c.format = format;
    c
}

use Arite::{Deux, Un, Zero};
use Effet::Calcul;

pub static COMMANDES: &[Commande] = &[
    avec(cmd("ADD", Some("+"), Deux, 1, Calcul(add)), None, Some("{} + {} = {}")),
    cmd(CLEAR, Some("esc"), Zero, 0, Effet::Effacer),
    avec(cmd("DIV", Some("/"), Deux, 1, Calcul(div)), Some(valide_non_nul), Some("{} / {} = {}")),
    cmd(DROP, None, Un, 0, Calcul(jeter)),
    cmd(DUP, None, Un, 2, Calcul(dup)),
    avec(cmd("FACT", Some("!"), Un, 1, Calcul(fact)), Some(valide_fact), Some("{}! = {}")),
    avec(cmd("INV", Some("i"), Un, 1, Calcul(inv)), Some(valide_non_nul), Some("1 / {} = {}")),
    // pas de touche : "l" est déjà LOG
    avec(cmd("LN", None, Un, 1, Calcul(ln_naturel)), Some(valide_strictement_positif), Some("ln({}) = {}")),
    avec(cmd("LOG", Some("l"), Un, 1, Calcul(log_dix)), Some(valide_strictement_positif), Some("log({}) = {}")),
    avec(cmd("MOD", Some("%"), Deux, 1, Calcul(modulo)), Some(valide_non_nul), Some("{} mod {} = {}")),
    avec(cmd("MUL", Some("*"), Deux, 1, Calcul(mul)), None, Some("{} * {} = {}")),
    cmd(NEG, Some("n"), Un, 1, Calcul(neg)),
    cmd("PI", Some("p"), Zero, 1, Calcul(pi)),
    avec(cmd("POW", Some("^"), Deux, 1, Calcul(pow)), Some(valide_puissance), Some("{} ^ {} = {}")),
    avec(cmd("SQRT", Some("@"), Un, 1, Calcul(sqrt)), Some(valide_positif), Some("sqrt({}) = {}")),
    avec(cmd("SUB", Some("-"), Deux, 1, Calcul(sub)), None, Some("{} - {} = {}")),
    cmd("SWAP", Some("s"), Deux, 2, Calcul(swap)),
    cmd(YANK, Some("y"), Un, 1, Calcul(yank)),
    avec(cmd(UNDO, Some("z"), Zero, 0, Effet::Annuler), Some(valide_annulation), None),
];

static PAR_NOM: OnceLock<HashMap<&'static str, &'static Commande>> = OnceLock::new();
static PAR_TOUCHE: OnceLock<HashMap<&'static str, &'static Commande>> = OnceLock::new();

pub fn par_nom(nom: &str) -> Option<&'static Commande> {
    PAR_NOM
        .get_or_init(|| COMMANDES.iter().map(|c| (c.nom, c)).collect())
        .get(nom)
        .copied()
}

pub fn par_touche(touche: &str) -> Option<&'static Commande> {
    PAR_TOUCHE
        .get_or_init(|| {
            COMMANDES
                .iter()
                .filter_map(|c| c.touche.map(|t| (t, c)))
                .collect()
        })
        .get(touche)
        .copied()
}

/// Remplit les "{}" du gabarit dans l’ordre ; emplacements en trop laissés vides.
pub fn formater(gabarit: &str, valeurs: &[String]) -> String {
    let mut morceaux = gabarit.split("{}");
    let mut out = String::from(morceaux.next().unwrap_or(""));
    let mut valeurs = valeurs.iter();
    for morceau in morceaux {
        if let Some(v) = valeurs.next() {
            out.push_str(v);
        }
        out.push_str(morceau);
    }
    out
}

/* ------------------------ Fonctions de calcul ------------------------ */

fn add(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::ajouter(&x[0], &x[1])])
}

fn sub(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::soustraire(&x[0], &x[1])])
}

fn mul(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::multiplier(&x[0], &x[1])])
}

fn div(x: &[Decimal], chiffres: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::diviser(&x[0], &x[1], chiffres)?])
}

fn modulo(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::modulo(&x[0], &x[1])?])
}

fn pow(x: &[Decimal], chiffres: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::puissance(&x[0], &x[1], chiffres)?])
}

fn swap(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![x[1].clone(), x[0].clone()])
}

fn jeter(_: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(Vec::new())
}

fn dup(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![x[0].clone(), x[0].clone()])
}

/// Rend la valeur telle quelle : la copie presse-papiers est faite par l’interface.
fn yank(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![x[0].clone()])
}

fn fact(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::factorielle(&x[0])?])
}

fn inv(x: &[Decimal], chiffres: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::inverse(&x[0], chiffres)?])
}

fn ln_naturel(x: &[Decimal], chiffres: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::ln(&x[0], chiffres)?])
}

fn log_dix(x: &[Decimal], chiffres: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::log10(&x[0], chiffres)?])
}

fn neg(x: &[Decimal], _: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::negatif(&x[0])])
}

fn sqrt(x: &[Decimal], chiffres: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::racine(&x[0], chiffres)?])
}

fn pi(_: &[Decimal], chiffres: u32) -> ResultatCalcul<Vec<Decimal>> {
    Ok(vec![op::pi(chiffres)])
}

/* ------------------------ Validateurs ------------------------ */

/// Dernier opérande (sommet de pile).
fn sommet<'a>(v: &VueValidation<'a>) -> Option<&'a Decimal> {
    v.operandes.last()
}

fn valide_non_nul(v: &VueValidation<'_>) -> Result<(), &'static str> {
    match sommet(v) {
        Some(x) if x.est_zero() => Err(DIVISION_PAR_ZERO),
        _ => Ok(()),
    }
}

fn valide_strictement_positif(v: &VueValidation<'_>) -> Result<(), &'static str> {
    match sommet(v) {
        Some(x) if !x.est_positif() => Err(PAS_POSITIF),
        _ => Ok(()),
    }
}

fn valide_positif(v: &VueValidation<'_>) -> Result<(), &'static str> {
    match sommet(v) {
        Some(x) if x.est_negatif() => Err(PAS_POSITIF),
        _ => Ok(()),
    }
}

fn valide_fact(v: &VueValidation<'_>) -> Result<(), &'static str> {
    match sommet(v) {
        Some(x) if x.est_negatif() || !x.est_entier() => Err(op::PAS_ENTIER_POSITIF),
        Some(x) if *x > Decimal::from(op::FACTORIELLE_MAX) => Err(op::TROP_GRAND),
        _ => Ok(()),
    }
}

fn valide_puissance(v: &VueValidation<'_>) -> Result<(), &'static str> {
    match v.operandes {
        [x, y] => op::puissance_impossible(x, y).map_or(Ok(()), Err),
        _ => Ok(()),
    }
}

fn valide_annulation(v: &VueValidation<'_>) -> Result<(), &'static str> {
    if v.annulations == 0 {
        return Err(RIEN_A_ANNULER);
    }
    Ok(())
}
