/*
[INPUT]:  Instrument names, currencies, wallet addresses, signed order params
[OUTPUT]: Account creation, instrument and ticker data, order signing diagnostics
[POS]:    HTTP layer - public endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use serde_json::json;

use crate::http::{LyraClient, Result};
use crate::types::{
    CreateAccountResponse, Currency, GetInstrumentsRequest, Instrument, InstrumentType,
    OrderDebugResponse, OrderRequest, Ticker,
};

impl LyraClient {
    /// Register a wallet with the exchange
    ///
    /// POST /public/create_account
    pub async fn create_account(&self, wallet: &str) -> Result<CreateAccountResponse> {
        let method = "public/create_account";
        let builder = self.public_request(method, &json!({ "wallet": wallet }))?;
        self.send_json(method, builder).await
    }

    /// POST /public/get_instrument
    pub async fn get_instrument(&self, instrument_name: &str) -> Result<Instrument> {
        let method = "public/get_instrument";
        let builder =
            self.public_request(method, &json!({ "instrument_name": instrument_name }))?;
        self.send_json(method, builder).await
    }

    /// Active or expired instruments of one type and currency
    ///
    /// POST /public/get_instruments
    pub async fn get_instruments(
        &self,
        currency: Currency,
        instrument_type: InstrumentType,
        expired: bool,
    ) -> Result<Vec<Instrument>> {
        let method = "public/get_instruments";
        let params = GetInstrumentsRequest {
            currency,
            expired,
            instrument_type,
        };
        let builder = self.public_request(method, &params)?;
        self.send_json(method, builder).await
    }

    /// POST /public/get_ticker
    pub async fn get_ticker(&self, instrument_name: &str) -> Result<Ticker> {
        let method = "public/get_ticker";
        let builder =
            self.public_request(method, &json!({ "instrument_name": instrument_name }))?;
        self.send_json(method, builder).await
    }

    /// Venue's view of how a signed order is encoded and hashed
    ///
    /// POST /public/order_debug
    pub async fn order_debug(&self, order: &OrderRequest) -> Result<OrderDebugResponse> {
        let method = "public/order_debug";
        let builder = self.public_request(method, order)?;
        self.send_json(method, builder).await
    }
}
