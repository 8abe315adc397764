// src/connectors/signer.rs
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use sha2::Sha256;

use crate::error::{TradeError, TradeResult};

type HmacSha256 = Hmac<Sha256>;

/// Кодировка подписи. Семейства эндпоинтов биржи ожидают разные варианты.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEncoding {
    /// base64 от бинарного HMAC (GET с query-строкой).
    Base64,
    /// hex-дайджест HMAC (POST с телом).
    Hex,
}

#[derive(Clone)]
pub struct RequestSigner {
    api_key: String,
    secret_key: String,
    passphrase: String,
    locale: String,
}

impl RequestSigner {
    pub fn new(api_key: String, secret_key: String, passphrase: String, locale: String) -> Self {
        Self {
            api_key,
            secret_key,
            passphrase,
            locale,
        }
    }

    /// HMAC-SHA256(secret, timestamp + METHOD + path[?query] + body).
    pub fn sign(
        &self,
        timestamp: &str,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: &str,
        encoding: SignatureEncoding,
    ) -> TradeResult<String> {
        let mut pre_hash = format!("{}{}{}", timestamp, method.as_str().to_uppercase(), path);
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            pre_hash.push('?');
            pre_hash.push_str(q);
        }
        pre_hash.push_str(body);

        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|_| TradeError::MissingField("secret_key".to_string()))?;
        mac.update(pre_hash.as_bytes());
        let digest = mac.finalize().into_bytes();

        Ok(match encoding {
            SignatureEncoding::Base64 => BASE64.encode(digest),
            SignatureEncoding::Hex => hex::encode(digest),
        })
    }

    pub fn headers(
        &self,
        timestamp: &str,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: &str,
        encoding: SignatureEncoding,
    ) -> TradeResult<HeaderMap> {
        let signature = self.sign(timestamp, method, path, query, body, encoding)?;

        // HeaderName::from_static требует нижний регистр; HTTP-заголовки регистронезависимы.
        let mut headers = HeaderMap::new();
        for (name, value) in [
            ("access-key", self.api_key.as_str()),
            ("access-sign", signature.as_str()),
            ("access-timestamp", timestamp),
            ("access-passphrase", self.passphrase.as_str()),
            ("locale", self.locale.as_str()),
        ] {
            let value = HeaderValue::from_str(value)
                .map_err(|_| TradeError::MissingField(format!("header {}", name)))?;
            headers.insert(HeaderName::from_static(name), value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}
