//! Key encoding helpers

pub mod spki;

pub use spki::{
    algorithm_from_pkcs8_der, algorithm_from_spki_der, decode_pem, KeyAlgorithm, PemKind,
};
