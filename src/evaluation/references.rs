use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BLUE_LINE: &[&str] = &[
    "5111 Chemin Queen-Mary, Montreal",
    "3740 Avenue Lacombe, Montreal",
    "2830, boul. Édouard-Monpetit, Montreal",
    "2040, boul. Édouard-Monpetit, Montreal",
    "1371 Avenue Van Horne, Montreal",
    "1050 Avenue Beaumont, Mont-Royal",
    "400 Avenue Ogilvy, Montreal",
    "7300 Boulevard Saint-Laurent, Montreal",
    "505 Rue Jean-Talon Est, Montreal",
    "1551 Rue Jean-Talon Est, Montreal",
    "7144 Rue D'Iberville, Montreal",
    "7325 Boulevard Saint-Michel, Montreal",
];

const GREEN_LINE: &[&str] = &[
    "7907 Rue Sherbrooke Est, Montreal",
    "7195 Rue Sherbrooke Est, Montreal",
    "6590 Rue Sherbrooke Est, Montreal",
    "5995, rue Sherbrooke Est, Montreal",
    "3075, Boulevard De L'Assomption, Montreal",
    "4801 Avenue Pierre-De Coubertin, Montreal",
    "2700 Boulevard Pie-IX, Montreal",
    "3575 Rue Hochelaga, Montreal",
    "3100 Rue Hochelaga, Montreal",
    "2570 Rue Ontario Est, Montreal",
    "1427 Rue Cartier, Montreal",
    "1250 Rue Sainte-Catherine Est, Montreal",
    "1500 Rue Berri, Montreal",
    "12 Boulevard De Maisonneuve Est, Montreal",
    "266 Boulevard De Maisonneuve Ouest, Montreal",
    "625 Boulevard De Maisonneuve Ouest, Montreal",
    "1102 Boulevard De Maisonneuve Ouest, Montreal",
    "1622 Boulevard De Maisonneuve Ouest, Montreal",
    "2021 Avenue Atwater, Montreal",
    "620 Atwater Avenue, Montreal",
    "2567 Rue du Centre, Montreal",
    "305 Rue Caisse, Montreal",
    "4214 Rue Wellington, Montreal",
    "700 Rue Willibrord, Montreal",
    "6200 Rue Drake, Montreal",
    "6750 Boulevard Monk, Montreal",
];

const ORANGE_LINE: &[&str] = &[
    "Rue Lucien Paiement, Laval",
    "1200 Boulevard De La Concorde Ouest, Laval",
    "5 boulevard Cartier Ouest, Laval",
    "575 Boulevard Henri-Bourassa Est, Montreal",
    "9961 Rue Berri, Montreal",
    "545 Boulevard Crémazie, Montreal",
    "8086 Rue Berri, Montreal",
    "505 Rue Jean-Talon Est, Montreal",
    "6542 Avenue De Chateaubriand, Montreal",
    "509 Boulevard Rosemont, Montreal",
    "501 Boulevard Saint-Joseph Est, Montreal",
    "482 Avenue du Mont-Royal Est, Montreal",
    "503 Rue Cherrier, Montreal",
    "1500 Rue Berri, Montreal",
    "960 Rue Sanguinet, Montreal",
    "960 Rue Saint-Urbain, Montreal",
    "640 Avenue Viger Ouest, Montreal",
    "1166, Avenue des Canadiens-de-Montréal, Montreal",
    "957 Rue Lucien-L'Allier, Montreal",
    "2060 Rue Saint-Antoine Ouest, Montreal",
    "620 Atwater Avenue, Montreal",
    "4087 Rue Saint-Jacques, Montreal",
    "5150 Boulevard De Maisonneuve Ouest, Montreal",
    "4243 Boulevard Décarie, Montreal",
    "5111 Chemin Queen-Mary, Montreal",
    "4735 Chemin de la Côte-Sainte-Catherine, Montreal",
    "6255-95 Avenue Victoria, Montreal",
    "7403 Boulevard Décarie, Montreal",
    "8251 Boulevard Décarie, Montreal",
    "590 Boulevard Décarie, Montreal",
];

fn owned(addresses: &[&str]) -> Vec<String> {
    addresses.iter().map(|a| a.to_string()).collect()
}

/// Station addresses grouped by transit line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSet {
    pub blue: Vec<String>,
    pub green: Vec<String>,
    pub orange: Vec<String>,
}

impl Default for ReferenceSet {
    fn default() -> Self {
        Self {
            blue: owned(BLUE_LINE),
            green: owned(GREEN_LINE),
            orange: owned(ORANGE_LINE),
        }
    }
}

impl ReferenceSet {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading reference addresses from {}", path.display()))?;
        let set: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing reference addresses in {}", path.display()))?;
        if set.is_empty() {
            anyhow::bail!("{} contains no reference addresses", path.display());
        }
        Ok(set)
    }

    /// Blue, then green, then orange. Duplicates across lines are kept.
    pub fn all(&self) -> Vec<String> {
        self.blue
            .iter()
            .chain(&self.green)
            .chain(&self.orange)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.blue.len() + self.green.len() + self.orange.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
