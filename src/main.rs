// src/main.rs
//
// Calculatrice RPN : point d’entrée NATIF + WEB (WASM)
// ----------------------------------------------------
// But:
// - NATIF (Linux/Windows/macOS) : eframe::run_native + NativeOptions
// - WEB  (wasm32)              : eframe::WebRunner + WebOptions + <canvas>
// - Journal (natif)            : env_logger, niveau via RUST_LOG
// - Réglages                   : variables CALC_RPN_* (voir noyau/reglages.rs)
// - Options (natif)            : -q (ni relecture ni sauvegarde), -v / --version
//
// Côté WEB (WASM) : index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

mod app;
mod noyau;

use app::AppCalc;
use noyau::Reglages;

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice RPN";

/* ------------------------ Options (natif) ------------------------ */

/// Calculatrice RPN décimale (pile, historique, annulation).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "calculatrice_rpn", disable_version_flag = true)]
struct Options {
    /// Ni relecture ni sauvegarde de la session
    #[arg(short = 'q')]
    sans_session: bool,

    /// Affiche la version
    #[arg(short = 'v', long = "version")]
    version: bool,
}

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let options_cli = Options::parse();
    if options_cli.version {
        println!("{TITRE_APP} {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let reglages = Reglages::depuis_env();
    log::info!("démarrage : {reglages:?} ({options_cli:?})");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([520.0, 740.0])
            .with_min_inner_size([420.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |cc| {
            let app = if options_cli.sans_session {
                AppCalc::sans_session(reglages)
            } else {
                AppCalc::nouvelle(reglages, cc.storage)
            };
            Ok(Box::new(app))
        }),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, Reglages, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// - Fixe le titre de l’onglet (document.title)
    /// - Récupère le <canvas id="the_canvas_id">
    /// - Démarre eframe WebRunner dessus (session rechargée depuis localStorage)
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        // pas d’environnement de processus côté web : réglages par défaut
        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(AppCalc::nouvelle(Reglages::default(), cc.storage)))),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
