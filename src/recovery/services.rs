use std::fmt;

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::mail::{escape_html, OutgoingEmail};

const TOKEN_BYTES: usize = 32;

/// A freshly generated reset secret and the digest that gets stored.
pub struct ResetToken {
    pub raw: String,
    pub hash: String,
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetToken")
            .field("raw", &"[REDACTED]")
            .field("hash", &self.hash)
            .finish()
    }
}

/// 32 bytes from the OS RNG, hex encoded.
pub fn generate_reset_token() -> ResetToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash_reset_token(&raw);
    ResetToken { raw, hash }
}

/// SHA-256 hex digest; deterministic so the stored value can be looked up.
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

pub fn reset_link(frontend_url: &str, raw_token: &str) -> String {
    format!("{frontend_url}/resetarSenha.html?token={raw_token}")
}

pub fn reset_email(to: &str, name: &str, link: &str, ttl_minutes: i64) -> OutgoingEmail {
    let name = escape_html(name);
    let html = format!(
        r#"<h2>Olá {name}!</h2>
<p>Você solicitou a recuperação de senha. Clique no link abaixo para resetar sua senha:</p>
<p><a href="{link}" style="background-color: #2563eb; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; display: inline-block;">Resetar Senha</a></p>
<p>Ou copie este link: {link}</p>
<p>Este link expira em {ttl_minutes} minutos.</p>
<p>Se você não solicitou esta recuperação, ignore este email.</p>
<p>Atenciosamente,<br>FRcomerce</p>"#
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: "Recuperação de Senha - FRcomerce".into(),
        html,
    }
}
