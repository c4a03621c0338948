//! User-facing text in the supported locales.

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Bahasa Indonesia.
    Id,
}

impl Locale {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "id" => Some(Self::Id),
            _ => None,
        }
    }
}

pub(crate) fn error_text(err: &ClaimError, locale: Locale, cooldown_secs: u64) -> String {
    use ClaimError::*;
    match (locale, err) {
        (Locale::En, ProviderUnavailable) => {
            "Please install MetaMask or another Ethereum wallet!".into()
        }
        (Locale::Id, ProviderUnavailable) => {
            "Silakan instal MetaMask atau dompet Ethereum lainnya!".into()
        }
        (Locale::En, ConnectionRejected(_)) => {
            "Wallet connection failed. Make sure your wallet is installed and unlocked.".into()
        }
        (Locale::Id, ConnectionRejected(_)) => {
            "Koneksi dompet gagal. Pastikan dompet Anda terinstal dan terbuka.".into()
        }
        (Locale::En, NoSignerConnected) => "No wallet connected. Connect your wallet first.".into(),
        (Locale::Id, NoSignerConnected) => {
            "Tidak ada dompet yang terhubung. Sambungkan dompet Anda terlebih dahulu.".into()
        }
        (Locale::En, RateLimited) => format!(
            "You must wait {cooldown_secs} seconds before requesting tokens again."
        ),
        (Locale::Id, RateLimited) => format!(
            "Anda harus menunggu {cooldown_secs} detik sebelum dapat meminta token lagi."
        ),
        (Locale::En, AlreadyClaimed) => format!(
            "This address has already claimed tokens. Wait {cooldown_secs} seconds or use another address."
        ),
        (Locale::Id, AlreadyClaimed) => format!(
            "Alamat ini telah mengklaim token. Silakan tunggu {cooldown_secs} detik atau gunakan alamat lain."
        ),
        (Locale::En, InsufficientFaucetBalance) => {
            "The faucet has run out of tokens. Sorry, please try again later.".into()
        }
        (Locale::Id, InsufficientFaucetBalance) => {
            "Faucet kehabisan token. Mohon maaf, silakan coba lagi nanti.".into()
        }
        (_, UnknownTransactionError(text)) if !text.is_empty() => text.clone(),
        (Locale::En, UnknownTransactionError(_)) => {
            "Something went wrong while requesting tokens.".into()
        }
        (Locale::Id, UnknownTransactionError(_)) => {
            "Terjadi kesalahan saat meminta token.".into()
        }
    }
}

pub(crate) fn success_text(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Success! Your tokens are on the way.",
        Locale::Id => "Operasi berhasil! Token sedang dalam perjalanan.",
    }
}

pub(crate) fn busy_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Processing...",
        Locale::Id => "Memproses...",
    }
}

pub(crate) fn wait_label(locale: Locale, secs: u64) -> String {
    match locale {
        Locale::En => format!("Wait ({secs}s)"),
        Locale::Id => format!("Tunggu ({secs}s)"),
    }
}

pub(crate) fn claim_label(locale: Locale, grant: u64, symbol: &str) -> String {
    match locale {
        Locale::En => format!("Get {grant} {symbol}"),
        Locale::Id => format!("Dapatkan {grant} {symbol}"),
    }
}

pub(crate) fn connect_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Connect Wallet",
        Locale::Id => "Sambungkan Dompet",
    }
}

pub(crate) fn connected_label(locale: Locale, short: &str) -> String {
    match locale {
        Locale::En => format!("Connected: {short}"),
        Locale::Id => format!("Terhubung: {short}"),
    }
}
