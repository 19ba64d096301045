pub mod pta;
pub mod xuexitong;
pub mod yuketang;
pub mod bank_images;
