//! Tests du catalogue via le moteur : pile avant -> commande -> pile après.
//!
//! Tout passe par `Calculatrice::executer` (arité, validateur, normalisation, historique).

use super::calculatrice::Calculatrice;
use super::catalogue::COMMANDES;
use super::decimal::Decimal;
use super::erreur::ErreurCalcul;

fn calc(pile: &[&str]) -> Calculatrice {
    let mut c = Calculatrice::default();
    for v in pile {
        let x: Decimal = v
            .parse()
            .unwrap_or_else(|e| panic!("littéral {v:?}: {e}"));
        c.entrer(x, false);
    }
    c
}

fn assert_commande(avant: &[&str], nom: &str, apres: &[&str]) {
    let mut c = calc(avant);
    c.executer(nom)
        .unwrap_or_else(|e| panic!("{nom} sur {avant:?}: {e}"));
    assert_eq!(c.pile_texte(), apres, "{nom} sur {avant:?}");
}

fn assert_refus(avant: &[&str], nom: &str, raison: &str) {
    let mut c = calc(avant);
    let e = c.executer(nom).expect_err(nom);
    assert_eq!(e.to_string(), raison, "{nom} sur {avant:?}");
    // rien n’a bougé
    assert_eq!(c.pile_texte(), avant, "{nom} sur {avant:?}");
    assert!(c.historique().is_empty());
}

/* ------------------------ Table de correction ------------------------ */

#[test]
fn table_des_commandes() {
    assert_commande(&["3", "5"], "ADD", &["8"]);
    assert_commande(&["8", "2"], "DIV", &["4"]);
    assert_commande(&["5"], "FACT", &["120"]);
    assert_commande(&["2"], "INV", &["0.5"]);
    assert_commande(&["10"], "LOG", &["1"]);
    assert_commande(&["5", "3"], "MOD", &["2"]);
    assert_commande(&["3"], "NEG", &["-3"]);
    assert_commande(&[], "PI", &["3.1415926536"]);
    assert_commande(&["2", "3"], "POW", &["8"]);
    assert_commande(&["9"], "SQRT", &["3"]);
    assert_commande(&["1", "2"], "SWAP", &["2", "1"]);
}

#[test]
fn autres_commandes() {
    assert_commande(&["7", "4"], "DROP", &["7"]);
    assert_commande(&["7"], "DUP", &["7", "7"]);
    assert_commande(&["3", "5"], "SUB", &["-2"]);
    assert_commande(&["1.5", "4"], "MUL", &["6"]);
    assert_commande(&["1"], "LN", &["0"]);
    assert_commande(&["2"], "LN", &["0.6931471806"]);
    assert_commande(&["42"], "YANK", &["42"]);
    assert_commande(&["1", "2", "3"], "CLEAR", &[]);
    assert_commande(&["0"], "FACT", &["1"]);
    assert_commande(&["-7", "2"], "MOD", &["-1"]);
}

#[test]
fn resultats_approches_normalises() {
    assert_commande(&["1", "3"], "DIV", &["0.3333333333"]);
    assert_commande(&["2"], "SQRT", &["1.4142135624"]);
    assert_commande(&["4", "0.5"], "POW", &["2"]);
    assert_commande(&["2", "-1"], "POW", &["0.5"]);
    assert_commande(&["2", "0.5"], "POW", &["1.4142135624"]);
    assert_commande(&["0", "0"], "POW", &["1"]);
    // log(1000) = 2.99999… avant aimantation
    assert_commande(&["1000"], "LOG", &["3"]);
    // grands résultats : toutes les décimales restent justes
    assert_commande(&["10", "30.5"], "POW", &["3162277660168379331998893544432.7185337196"]);
    assert_commande(&["2", "100.5"], "POW", &["1792728671193156477399422023278.6614963942"]);
}

/* ------------------------ Validateurs ------------------------ */

#[test]
fn erreurs_des_validateurs() {
    assert_refus(&["8", "0"], "DIV", "divide by zero");
    assert_refus(&["0"], "INV", "divide by zero");
    assert_refus(&["5", "0"], "MOD", "divide by zero");
    assert_refus(&["-3"], "FACT", "not a positive int");
    assert_refus(&["2.5"], "FACT", "not a positive int");
    assert_refus(&["101"], "FACT", "too large");
    assert_refus(&["0"], "LN", "not positive");
    assert_refus(&["-1"], "LOG", "not positive");
    assert_refus(&["-4"], "SQRT", "not positive");
    assert_refus(&["0", "-1"], "POW", "divide by zero");
    assert_refus(&["-8", "0.5"], "POW", "not a real number");
    assert_refus(&["10", "100000"], "POW", "too large");
    assert_refus(&[], "UNDO", "nothing to undo");
}

#[test]
fn erreurs_d_arite() {
    assert_refus(&[], "ADD", "too few arguments");
    assert_refus(&["1"], "ADD", "too few arguments");
    assert_refus(&["1"], "SWAP", "too few arguments");
    assert_refus(&[], "NEG", "stack is empty");
    assert_refus(&[], "DROP", "stack is empty");
    assert_refus(&[], "YANK", "stack is empty");
}

#[test]
fn variantes_d_erreur() {
    let mut c = calc(&["1"]);
    assert!(matches!(
        c.executer("ADD"),
        Err(ErreurCalcul::OperandesInsuffisantes(_))
    ));
    let mut c = calc(&["0"]);
    assert!(matches!(
        c.executer("INV"),
        Err(ErreurCalcul::OperandesInvalides(_))
    ));
}

/* ------------------------ Historique + annulation ------------------------ */

#[test]
fn historique_des_commandes() {
    let mut c = calc(&["123", "456"]);
    c.executer("ADD").unwrap();
    c.entrer("2".parse().unwrap(), false);
    c.executer("POW").unwrap();
    c.executer("SQRT").unwrap();
    c.executer("FACT").unwrap_err();
    assert_eq!(
        c.historique(),
        ["123 + 456 = 579", "579 ^ 2 = 335241", "sqrt(335241) = 579"]
    );
}

#[test]
fn toute_commande_s_annule() {
    for cmd in COMMANDES.iter().filter(|c| c.nom != "UNDO") {
        let mut c = calc(&["6", "3"]);
        let avant = c.pile_texte();
        c.executer(cmd.nom)
            .unwrap_or_else(|e| panic!("{}: {e}", cmd.nom));
        c.executer("UNDO")
            .unwrap_or_else(|e| panic!("UNDO après {}: {e}", cmd.nom));
        assert_eq!(c.pile_texte(), avant, "{}", cmd.nom);
    }
}

#[test]
fn enchainement_rpn() {
    // (2 + 3) * 4 - 5 / 2
    let mut c = calc(&["2", "3"]);
    c.executer("ADD").unwrap();
    c.entrer("4".parse().unwrap(), false);
    c.executer("MUL").unwrap();
    c.entrer("5".parse().unwrap(), false);
    c.entrer("2".parse().unwrap(), false);
    c.executer("DIV").unwrap();
    c.executer("SUB").unwrap();
    assert_eq!(c.pile_texte(), ["17.5"]);
    assert_eq!(c.historique().len(), 4);
}
