/*
[INPUT]:  Auth headers and signed request bodies
[OUTPUT]: Subaccount listings, subaccount creation, order placement and cancellation
[POS]:    HTTP layer - private endpoints (require X-Lyra* auth headers)
[UPDATE]: When adding new private endpoints or changing auth scheme
*/

use serde_json::json;

use crate::auth::AuthHeader;
use crate::http::{LyraClient, Result};
use crate::types::{
    CancelAllRequest, CreateSubaccountRequest, CreateSubaccountResponse, OrderRequest,
    OrderResponse, SubaccountsResponse,
};

impl LyraClient {
    /// Subaccounts owned by the authenticated wallet
    ///
    /// POST /private/get_subaccounts
    pub async fn get_subaccounts(&self, auth: &AuthHeader) -> Result<SubaccountsResponse> {
        let method = "private/get_subaccounts";
        let builder = self.private_request(method, &json!({ "wallet": auth.wallet }), auth)?;
        self.send_json(method, builder).await
    }

    /// Submit a signed deposit action that opens a new subaccount
    ///
    /// POST /private/create_subaccount
    pub async fn create_subaccount(
        &self,
        auth: &AuthHeader,
        request: &CreateSubaccountRequest,
    ) -> Result<CreateSubaccountResponse> {
        let method = "private/create_subaccount";
        let builder = self.private_request(method, request, auth)?;
        self.send_json(method, builder).await
    }

    /// Submit a signed order
    ///
    /// POST /private/order
    pub async fn order(&self, auth: &AuthHeader, request: &OrderRequest) -> Result<OrderResponse> {
        let method = "private/order";
        let builder = self.private_request(method, request, auth)?;
        self.send_json(method, builder).await
    }

    /// Cancel every open order of a subaccount
    ///
    /// POST /private/cancel_all
    pub async fn cancel_all(&self, auth: &AuthHeader, subaccount_id: u64) -> Result<String> {
        let method = "private/cancel_all";
        let builder = self.private_request(method, &CancelAllRequest { subaccount_id }, auth)?;
        self.send_json(method, builder).await
    }
}
