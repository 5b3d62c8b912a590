// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// Un test de primalité raté n'est PAS une erreur : c'est un booléen.
// Seules les situations où l'appelant ne peut pas obtenir de résultat
// déterminé produisent une Err(...).
// ===========================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// Littéral numérique absent ou invalide à la construction
    #[error("Paramètre `{field}` invalide : {reason}")]
    Parameter { field: &'static str, reason: String },

    /// p et q fournis ne respectent pas p = 2q + 1 (niveau HIGH)
    #[error("Ordre du groupe et module incohérents : p != 2q + 1")]
    Consistency,

    /// Niveau de sécurité inconnu (attendu HIGH, MEDIUM ou LOW)
    #[error("Niveau de sécurité invalide : {0}")]
    InvalidLevel(String),

    /// Le message n'est pas un entier élément du groupe
    #[error("Type de message non supporté : le message doit être un entier de [0, p)")]
    UnsupportedMessageType,

    /// Le message entier est >= p (hors du groupe)
    #[error("Le message doit être dans [0, p)")]
    MessageOutOfRange,

    /// c1 ou c2 hors de [1, p)
    #[error("Le chiffré doit être dans [1, p)")]
    CiphertextOutOfRange,

    /// La taille de groupe demandée est trop petite
    #[error("Taille de groupe {requested} bits insuffisante, minimum requis : {minimum} bits")]
    KeySizeTooSmall { requested: u64, minimum: u64 },

    // --- Erreurs d'état du moteur ---
    /// Le module p n'est pas encore défini
    #[error("Moteur non initialisé : le module p est absent")]
    NotInitialized,

    /// p, g, y et x ne sont pas tous disponibles
    #[error("Moteur incomplet : p, g, y et x doivent tous être définis")]
    NotReady,

    /// checkSecurity() n'a pas encore validé le moteur
    #[error("Moteur non sécurisé : appelez check_security() avant toute opération")]
    InsecureEngine,

    /// Lecture de la clé privée hors niveau LOW
    #[error("Violation de la politique de sécurité : passez d'abord au niveau LOW")]
    PrivateKeyWithheld,

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    #[error("Impossible de calculer l'inverse modulaire (gcd != 1)")]
    NoModularInverse,

    // --- Erreurs d'environnement ---
    /// La source d'entropie du système a échoué
    #[error("Source d'entropie du système indisponible : {0}")]
    Entropy(String),

    /// Le thread de recherche de premier s'est terminé sans résultat
    #[error("La recherche de nombre premier en arrière-plan a été interrompue")]
    PrimeSearchAborted,

    /// Le verrou du moteur partagé est empoisonné (thread paniqué)
    #[error("Verrou du moteur partagé empoisonné")]
    LockPoisoned,

    // --- Erreurs des collaborateurs ---
    /// Échec réseau, parsing ou validation de la source distante
    #[error("Source distante de groupes : {0}")]
    RemoteSource(String),

    /// Échec d'E/S ou de validation du magasin hors-ligne
    #[error("Magasin de groupes hors-ligne : {0}")]
    GroupStore(String),

    /// Snapshot du moteur illisible ou incohérent
    #[error("Snapshot du moteur invalide : {0}")]
    Snapshot(String),
}
