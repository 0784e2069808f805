pub mod bankroll_service;
pub mod calculs;
pub mod montante_service;
pub mod palier_service;
pub mod resolution;
pub mod stats_service;
