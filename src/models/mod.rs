// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - settings : Bankroll (singleton, id = 1)
//   - montante : Montantes (séquences de mises progressives)
//   - palier : Paliers d'une montante (paris simples ou combinés)
//   - historique_bankroll : Journal des opérations bankroll (append-only)
//   - users : Compte administrateur unique
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les montants utilisent rust_decimal (jamais de f64 en base)
//   - Les états (etat, statut, objectif, type) sont des ActiveEnum fermés
//   - historique_bankroll référence une montante sans cascade (référence faible)
//
// ============================================================================

pub mod dto;
pub mod health;
pub mod historique_bankroll;
pub mod montante;
pub mod palier;
pub mod settings;
pub mod users;
