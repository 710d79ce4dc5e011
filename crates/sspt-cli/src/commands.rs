pub mod permute;
pub mod score;
