/*
[INPUT]:  Action fields, module payloads, protocol constants
[OUTPUT]: Canonical digests and signed actions
[POS]:    Signing layer - the request-signing engine
[UPDATE]: When action encoding or digest construction changes
*/

pub mod action;
pub mod fixed_point;
pub mod module_data;
pub mod nonce;

pub use action::{Action, typed_data_hash};
pub use fixed_point::{
    from_fixed_point_signed, from_fixed_point_unsigned, to_fixed_point_signed,
    to_fixed_point_unsigned,
};
pub use module_data::{DepositModuleData, ModuleData, TradeModuleData};
pub use nonce::{MAX_NONCE_OFFSET_MS, NonceGenerator, expiry_after, expiry_from_now, nonce_for};
