//! Canonical endpoint paths of the wallet service.

use urlencoding::encode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Endpoints {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /login`
    pub fn login(&self) -> String {
        format!("{}/login", self.base_url)
    }

    /// `GET /user/{userId}`
    pub fn user(&self, user_id: &str) -> String {
        format!("{}/user/{}", self.base_url, encode(user_id))
    }

    /// `GET /wallet/{walletId}`
    pub fn wallet(&self, wallet_id: &str) -> String {
        format!("{}/wallet/{}", self.base_url, encode(wallet_id))
    }

    /// `POST /wallet/{walletId}/transaction`
    pub fn submit_transaction(&self, wallet_id: &str) -> String {
        format!("{}/transaction", self.wallet(wallet_id))
    }

    /// `GET /wallet/{walletId}/transaction/{transactionId}`
    pub fn transaction(&self, wallet_id: &str, transaction_id: &str) -> String {
        format!("{}/transaction/{}", self.wallet(wallet_id), encode(transaction_id))
    }

    /// `GET /wallet/{walletId}/transactions`
    pub fn transactions(&self, wallet_id: &str) -> String {
        format!("{}/transactions", self.wallet(wallet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let endpoints = Endpoints::new("http://localhost:3000/api/");
        assert_eq!(endpoints.login(), "http://localhost:3000/api/login");
        assert_eq!(endpoints.user("u-1"), "http://localhost:3000/api/user/u-1");
        assert_eq!(endpoints.wallet("w1"), "http://localhost:3000/api/wallet/w1");
        assert_eq!(
            endpoints.submit_transaction("w1"),
            "http://localhost:3000/api/wallet/w1/transaction"
        );
        assert_eq!(
            endpoints.transaction("w1", "t1"),
            "http://localhost:3000/api/wallet/w1/transaction/t1"
        );
        assert_eq!(
            endpoints.transactions("w1"),
            "http://localhost:3000/api/wallet/w1/transactions"
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let endpoints = Endpoints::new("http://h");
        assert_eq!(endpoints.wallet("a/b c"), "http://h/wallet/a%2Fb%20c");
    }
}
