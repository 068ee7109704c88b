pub mod keygen;
pub mod serve;
