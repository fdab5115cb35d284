// src/noyau/calculatrice.rs
//
// La calculatrice : pile + historique + instantanés d’annulation, et l’exécution
// des commandes du catalogue.
//
// Contrats :
// - Seul mutateur de la pile, de l’historique et des annulations.
// - Toute valeur empilée est normalisée (précision + aimantation entière).
// - Pile / historique / annulations bornés : on jette les plus anciens, jamais les récents.
// - executer() est atomique : soit validation -> instantané -> mutation -> historique,
//   soit rien après la validation (erreur renvoyée, état intact).

use log::{debug, warn};

use super::catalogue::{self, Effet, VueValidation};
use super::decimal::Decimal;
use super::erreur::{ErreurCalcul, ResultatCalcul};
use super::operations::GARDE;
use super::reglages::Reglages;

#[derive(Clone, Debug)]
pub struct Calculatrice {
    reglages: Reglages,
    pile: Vec<Decimal>,
    historique: Vec<String>,
    annulations: Vec<Vec<Decimal>>,
}

impl Default for Calculatrice {
    fn default() -> Self {
        Self::new(Reglages::default())
    }
}

/// Retire les plus anciens éléments (début) au-delà de `max`.
fn tronquer_debut<T>(v: &mut Vec<T>, max: usize) {
    if v.len() > max {
        let trop = v.len() - max;
        v.drain(..trop);
    }
}

impl Calculatrice {
    pub fn new(reglages: Reglages) -> Self {
        Self {
            reglages,
            pile: Vec::new(),
            historique: Vec::new(),
            annulations: Vec::new(),
        }
    }

    pub fn reglages(&self) -> &Reglages {
        &self.reglages
    }

    /* ------------------------ Accès ------------------------ */

    pub fn pile(&self) -> &[Decimal] {
        &self.pile
    }

    pub fn historique(&self) -> &[String] {
        &self.historique
    }

    pub fn profondeur_annulation(&self) -> usize {
        self.annulations.len()
    }

    pub fn len(&self) -> usize {
        self.pile.len()
    }

    pub fn est_vide(&self) -> bool {
        self.pile.is_empty()
    }

    pub fn sommet(&self) -> Option<&Decimal> {
        self.pile.last()
    }

    /// Pile en texte canonique (export vers la persistance).
    pub fn pile_texte(&self) -> Vec<String> {
        self.pile.iter().map(Decimal::to_string).collect()
    }

    /// Remplace la pile par des valeurs textuelles (import depuis la persistance).
    /// Tout ou rien : une valeur illisible laisse la pile intacte.
    pub fn definir_pile(&mut self, valeurs: &[String]) -> ResultatCalcul<()> {
        let lues = valeurs
            .iter()
            .map(|s| s.parse::<Decimal>())
            .collect::<Result<Vec<_>, _>>()?;
        self.pile.clear();
        for v in lues {
            self.empiler(v);
        }
        Ok(())
    }

    pub fn definir_historique(&mut self, lignes: Vec<String>) {
        self.historique = lignes;
        tronquer_debut(&mut self.historique, self.reglages.historique_max);
    }

    /// Les N lignes visibles, du plus profond ("N: ") au sommet ("1: valeur").
    pub fn affichage(&self) -> Vec<String> {
        let n = self.reglages.lignes_visibles;
        (0..n)
            .map(|ii| {
                let rang = n - ii;
                match self.pile.len().checked_sub(rang) {
                    Some(si) => format!("{rang}: {}", self.pile[si]),
                    None => format!("{rang}: "),
                }
            })
            .collect()
    }

    /* ------------------------ Annulation ------------------------ */

    fn instantane(&mut self) {
        self.annulations.push(self.pile.clone());
        tronquer_debut(&mut self.annulations, self.reglages.annulation_max);
    }

    /// Restaure la pile du dernier instantané. Sans instantané : rien, renvoie false.
    /// L’historique n’est jamais restauré.
    pub fn annuler(&mut self) -> bool {
        match self.annulations.pop() {
            Some(pile) => {
                self.pile = pile;
                true
            }
            None => false,
        }
    }

    /* ------------------------ Pile ------------------------ */

    /// Vide pile et historique (les instantanés restent : CLEAR s’annule).
    pub fn effacer(&mut self) {
        self.pile.clear();
        self.historique.clear();
    }

    /// Saisie d’une valeur. Explicite (touche Entrée) => instantané avant l’empilement ;
    /// implicite (déclenchée par une commande) => groupée avec cette commande.
    pub fn entrer(&mut self, valeur: Decimal, explicite: bool) {
        if explicite {
            self.instantane();
        }
        debug!("entrée {valeur} (explicite: {explicite})");
        self.empiler(valeur);
    }

    fn empiler(&mut self, valeur: Decimal) {
        let v = self.normaliser(&valeur);
        self.pile.push(v);
        tronquer_debut(&mut self.pile, self.reglages.pile_max);
    }

    pub fn normaliser(&self, x: &Decimal) -> Decimal {
        x.normaliser(self.reglages.precision, &self.reglages.epsilon)
    }

    fn ajouter_historique(&mut self, ligne: String) {
        self.historique.push(ligne);
        tronquer_debut(&mut self.historique, self.reglages.historique_max);
    }

    /* ------------------------ Exécution ------------------------ */

    /// Exécute une commande du catalogue par son nom.
    ///
    /// Panique si le nom est inconnu : le catalogue est fermé, c’est une erreur d’appelant.
    pub fn executer(&mut self, nom: &str) -> ResultatCalcul<()> {
        let Some(cmd) = catalogue::par_nom(nom) else {
            panic!("commande inconnue: {nom}");
        };

        // 1) assez d’opérandes ?
        let n = cmd.arite.entrees();
        if self.pile.len() < n {
            warn!("{nom} refusé : {}", cmd.arite.manque());
            return Err(ErreurCalcul::OperandesInsuffisantes(cmd.arite.manque()));
        }
        let debut = self.pile.len() - n;

        // 2) validateur (lecture seule)
        if let Some(valide) = cmd.valide {
            let vue = VueValidation {
                operandes: &self.pile[debut..],
                annulations: self.annulations.len(),
            };
            if let Err(raison) = valide(&vue) {
                warn!("{nom} refusé : {raison}");
                return Err(ErreurCalcul::invalide(raison));
            }
        }

        match cmd.effet {
            Effet::Annuler => {
                self.annuler();
            }
            Effet::Effacer => {
                self.instantane();
                self.effacer();
            }
            Effet::Calcul(f) => {
                // 3) calcul sur opérandes empruntés : un échec ne touche à rien
                let sorties = f(&self.pile[debut..], self.chiffres_calcul()).map_err(|e| {
                    warn!("{nom} refusé : {e}");
                    e
                })?;
                debug_assert_eq!(sorties.len(), cmd.sorties, "{nom}: sorties");
                let sorties: Vec<Decimal> = sorties.iter().map(|x| self.normaliser(x)).collect();

                // 4) instantané, puis mutation
                self.instantane();
                let entrees = self.pile.split_off(debut);

                if let Some(gabarit) = cmd.format {
                    let valeurs: Vec<String> = entrees
                        .iter()
                        .chain(sorties.iter())
                        .map(Decimal::to_string)
                        .collect();
                    self.ajouter_historique(catalogue::formater(gabarit, &valeurs));
                }

                debug!(
                    "{nom}: {} -> {}",
                    texte(&entrees),
                    texte(&sorties)
                );
                for v in sorties {
                    self.empiler(v);
                }
            }
        }

        Ok(())
    }

    /// Précision des opérations approchées : travail + garde, la normalisation arrondit ensuite.
    fn chiffres_calcul(&self) -> u32 {
        self.reglages.precision + GARDE
    }
}

fn texte(valeurs: &[Decimal]) -> String {
    valeurs
        .iter()
        .map(Decimal::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
