// =========================================================
// Démonstration — moteur ElGamal sur groupe de safe prime
// Génération locale, source distante, groupe jouet
// Menu interactif avec mesure des temps d'exécution
// =========================================================

// ── Moteur et collaborateurs ──────────────────────────────
use elgamal_crypto::{
    uniform_in_range, CryptoError, ElGamalEngine, EngineParams, GroupSource, OfflineGroupStore,
    RemoteGroupSource, DEFAULT_ORDER_BITS, MIN_ORDER_BITS,
};
use elgamal_crypto::key_management::snapshot_to_string;

// ── Stdlib & crates externes ──────────────────────────────
use log::{info, warn};
use num_bigint::BigUint;
use num_traits::Zero;
use std::io::{self, Write};
use std::time::Instant;

// ── Répertoires de travail ────────────────────────────────
const GROUPS_DIR:    &str = "groups";
const SNAPSHOT_PATH: &str = "engine_snapshot.json";

// Taille proposée par défaut en démonstration (4096 bits prend plusieurs minutes)
const DEMO_ORDER_BITS: u64 = 256;

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError et io::Error pour propager toutes les
// erreurs via ?
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(std::io::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "Erreur cryptographique : {}", e),
            AppError::Io(e)     => write!(f, "Erreur I/O : {}", e),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG prend le pas sur le filtre par défaut
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    loop {
        afficher_menu();
        let choix = lire_ligne();

        let res = match choix.as_str() {
            "1" => demonstration_locale(),
            "2" => demonstration_distante(),
            "3" => demonstration_jouet(),
            "4" => { println!("\nAu revoir !\n"); break; }
            _   => { println!("\nChoix invalide. Veuillez choisir 1, 2, 3 ou 4.\n"); continue; }
        };

        if let Err(e) = res {
            eprintln!("\n[ERREUR] {}\n", e);
        }

        println!("\nAppuyez sur Entrée pour continuer...");
        let mut pause = String::new();
        io::stdin().read_line(&mut pause).ok();
    }
}

// ─────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────

fn afficher_menu() {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   MOTEUR ELGAMAL — MENU                       ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!("\n  [1] Génération locale du groupe");
    println!("  [2] Groupe téléchargé (source distante)");
    println!("  [3] Groupe jouet p = 23");
    println!("  [4] Quitter\n");
    print!("Votre choix : ");
    io::stdout().flush().ok();
}

fn lire_ligne() -> String {
    let mut input = String::new();
    io::stdin().read_line(&mut input).ok();
    input.trim().to_string()
}

fn lire_taille() -> u64 {
    print!(
        "  Taille du module p en bits [{}..{}] (Entrée = {}) : ",
        MIN_ORDER_BITS, DEFAULT_ORDER_BITS, DEMO_ORDER_BITS
    );
    io::stdout().flush().ok();
    match lire_ligne().parse::<u64>() {
        Ok(bits) if bits >= MIN_ORDER_BITS => bits,
        Ok(bits) => {
            println!("  {} bits est trop petit, utilisation de {} bits", bits, MIN_ORDER_BITS);
            MIN_ORDER_BITS
        }
        Err(_) => DEMO_ORDER_BITS,
    }
}

fn afficher_groupe(engine: &ElGamalEngine) {
    let bits = |v: Option<BigUint>| v.map(|v| v.bits()).unwrap_or(0);
    println!("--- GROUPE ---");
    println!("  |p|      = {} bits", bits(engine.modulus()));
    println!("  |q|      = {} bits", bits(engine.group_order()));
    println!("  |g|      = {} bits", bits(engine.generator()));
    println!("--- CLÉ PUBLIQUE ---");
    println!("  |y|      = {} bits", bits(engine.public_key()));
    println!("  niveau   = {}", engine.security_level());
}

// ─────────────────────────────────────────────────────────
// Aller-retour chiffrement / déchiffrement commun aux démos
// ─────────────────────────────────────────────────────────

fn aller_retour(engine: &mut ElGamalEngine) -> Result<(), AppError> {
    let t = Instant::now();
    let securise = engine.check_security()?;
    println!("\n  Validation ({})  : {:.3?} → {}", engine.security_level(), t.elapsed(), securise);
    if !securise {
        warn!("groupe rejeté par check_security");
        return Ok(());
    }

    let p = engine.modulus().ok_or(CryptoError::NotInitialized)?;
    let m = uniform_in_range(&BigUint::zero(), &p)?;
    println!("  m        = {} bits", m.bits());

    let t      = Instant::now();
    let cipher = engine.encrypt(m.clone())?;
    let duree_enc = t.elapsed();

    let t      = Instant::now();
    let plain  = engine.decrypt(&cipher)?;
    let duree_dec = t.elapsed();

    println!("  Chiffrement     : {:.3?}", duree_enc);
    println!("  Déchiffrement   : {:.3?}", duree_dec);
    if plain == m {
        println!("  Vérifié : D(E(m)) = m");
    } else {
        println!("  Erreur : le déchiffrement ne restitue pas m !");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────
// [1] Génération locale
// ─────────────────────────────────────────────────────────

fn demonstration_locale() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    ElGamal — Génération locale");
    println!("==============================================");

    let bits = lire_taille();
    println!("\n  Recherche d'un safe prime ({} bits)...", bits);

    let mut engine = ElGamalEngine::new();
    let t = Instant::now();
    engine.generate_keys(bits)?;
    let duree = t.elapsed();
    println!("  Groupe et clés générés — temps : {:.3?}\n", duree);
    afficher_groupe(&engine);

    aller_retour(&mut engine)
}

// ─────────────────────────────────────────────────────────
// [2] Source distante, avec cache hors-ligne
// ─────────────────────────────────────────────────────────

fn demonstration_distante() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    ElGamal — Groupe téléchargé");
    println!("==============================================");

    let bits   = lire_taille();
    let remote = RemoteGroupSource::default();
    let store  = OfflineGroupStore::new(GROUPS_DIR);

    let t = Instant::now();
    let pair = match remote.fetch_pair(bits) {
        Ok(pair) => {
            println!("  Couple reçu de {} ({:.3?})", remote.url_for(bits), t.elapsed());
            if store.save_pair(bits, &pair)? {
                info!("couple mis en cache dans {}", store.bits_dir(bits).display());
            }
            pair
        }
        Err(e) => {
            println!("  Source distante indisponible ({}) — repli sur {}/", e, GROUPS_DIR);
            store.fetch_pair(bits)?
        }
    };

    let mut engine = ElGamalEngine::new();
    engine.initialize_with_pair(pair)?;
    afficher_groupe(&engine);

    aller_retour(&mut engine)
}

// ─────────────────────────────────────────────────────────
// [3] Groupe jouet : p = 23, q = 11, g = 4, x = 6
// ─────────────────────────────────────────────────────────

fn demonstration_jouet() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    ElGamal — Groupe jouet p = 23");
    println!("==============================================");

    let mut engine = ElGamalEngine::from_params(
        EngineParams::new().modulus("23").generator("4").public_key("2").private_key("6"),
    )?;
    engine.set_security_level("LOW")?;
    afficher_groupe(&engine);

    if !engine.check_security()? {
        return Ok(());
    }
    let cipher = engine.encrypt(9u32)?;
    println!("\n  E(9)      = ({}, {})", cipher.c1, cipher.c2);
    println!("  D(E(9))   = {}", engine.decrypt(&cipher)?);

    // Niveau LOW : l'export contient x, et r est révélé puis purgé
    let snapshot = engine.export(true)?;
    let json     = snapshot_to_string(&snapshot)?;
    std::fs::write(SNAPSHOT_PATH, &json)?;
    println!("\n  Snapshot écrit dans {} :\n{}", SNAPSHOT_PATH, json);

    Ok(())
}
