use std::sync::Arc;

use paygate_canonical::{
    CanonicalEngine, CanonicalError, CompactionPolicy, Compactor, FieldValue, Record,
    SemanticType, ShapeDescription, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Wire name of the signature field, excluded from every signing string.
pub const SIGN_FIELD: &str = "sign";

/// Tag selecting the snake_case JSON names used for signing.
pub const JSON_TAG: &str = "json";

/// Tag selecting the lowerCamel names of the protobuf JSON mapping.
pub const PROTOBUF_TAG: &str = "protobuf";

/// Order request submitted by a merchant to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayOrder {
    /// Interface version.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Merchant-side order number.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_trade_no: String,
    /// Amount in minor units (cents).
    #[serde(skip_serializing_if = "is_zero")]
    pub pay_amount: u32,
    /// ISO 4217 currency code.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency: String,
    /// Asynchronous notification endpoint; must not carry a query string.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notify_url: String,
    /// Front-end redirect after payment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub return_url: String,
    /// Merchant application id assigned by the gateway.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub app_id: String,
    /// `MD5`, `SHA256` or `ED25519`; empty means the merchant default.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sign_type: String,
    /// Signature over the canonical string.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sign: String,
    /// Merchant order time, `YYYY-MM-DD hh:mm:ss`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub order_time: String,
    /// Payer IP.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_ip: String,
    /// Payer id in the merchant system.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    /// Payer account, optional.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payer_account: String,
    /// Merchant product id.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_id: String,
    /// Product name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_name: String,
    /// Product description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_describe: String,
    /// Parameter encoding; only `utf-8` is accepted.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub charset: String,
    /// Opaque JSON echoed back in callbacks.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub callback_json: String,
    /// Extension JSON.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ext_json: String,
    /// Channel id; resolved from `method` when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    /// Payment method, e.g. QR code or card.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    /// Request instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Timestamp>,
}

impl PayOrder {
    /// Compactor producing the signing string of an order: `json` wire
    /// names, `sign` excluded, empties skipped, keys sorted.
    pub fn signing_compactor(engine: &CanonicalEngine) -> Result<Arc<Compactor<Self>>, CanonicalError> {
        engine
            .compactor(JSON_TAG, CompactionPolicy::signing(SIGN_FIELD))
            .map(Arc::new)
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn text(value: &str) -> FieldValue<'_> {
    FieldValue::Str(value)
}

impl Record for PayOrder {
    fn shape() -> ShapeDescription<Self> {
        use SemanticType::{String as Str, Timestamp as Ts, Uint32};

        ShapeDescription::<Self>::new("PayOrder")
            .field("Version", &[("json", "version")], Str, |o| text(&o.version))
            .field(
                "OutTradeNo",
                &[("json", "out_trade_no"), ("protobuf", "outTradeNo")],
                Str,
                |o| text(&o.out_trade_no),
            )
            .field(
                "PayAmount",
                &[("json", "pay_amount"), ("protobuf", "payAmount")],
                Uint32,
                |o| o.pay_amount.into(),
            )
            .field("Currency", &[("json", "currency")], Str, |o| text(&o.currency))
            .field(
                "NotifyURL",
                &[("json", "notify_url"), ("protobuf", "notifyURL")],
                Str,
                |o| text(&o.notify_url),
            )
            .field(
                "ReturnURL",
                &[("json", "return_url"), ("protobuf", "returnURL")],
                Str,
                |o| text(&o.return_url),
            )
            .field(
                "AppID",
                &[("json", "app_id"), ("protobuf", "appId")],
                Str,
                |o| text(&o.app_id),
            )
            .field(
                "SignType",
                &[("json", "sign_type"), ("protobuf", "signType")],
                Str,
                |o| text(&o.sign_type),
            )
            .field("Sign", &[("json", "sign")], Str, |o| text(&o.sign))
            .field(
                "OrderTime",
                &[("json", "order_time"), ("protobuf", "orderTime")],
                Str,
                |o| text(&o.order_time),
            )
            .field(
                "UserIP",
                &[("json", "user_ip"), ("protobuf", "userIP")],
                Str,
                |o| text(&o.user_ip),
            )
            .field(
                "UserID",
                &[("json", "user_id"), ("protobuf", "userID")],
                Str,
                |o| text(&o.user_id),
            )
            .field(
                "PayerAccount",
                &[("json", "payer_account"), ("protobuf", "payerAccount")],
                Str,
                |o| text(&o.payer_account),
            )
            .field(
                "ProductID",
                &[("json", "product_id"), ("protobuf", "productID")],
                Str,
                |o| text(&o.product_id),
            )
            .field(
                "ProductName",
                &[("json", "product_name"), ("protobuf", "productName")],
                Str,
                |o| text(&o.product_name),
            )
            .field(
                "ProductDescribe",
                &[("json", "product_describe"), ("protobuf", "productDescribe")],
                Str,
                |o| text(&o.product_describe),
            )
            .field("Charset", &[("json", "charset")], Str, |o| text(&o.charset))
            .field(
                "CallbackJSON",
                &[("json", "callback_json"), ("protobuf", "callbackJSON")],
                Str,
                |o| text(&o.callback_json),
            )
            .field(
                "ExtJSON",
                &[("json", "ext_json"), ("protobuf", "extJSON")],
                Str,
                |o| text(&o.ext_json),
            )
            .field(
                "ChannelID",
                &[("json", "channel_id"), ("protobuf", "channelID")],
                Str,
                |o| text(&o.channel_id),
            )
            .field("Method", &[("json", "method")], Str, |o| text(&o.method))
            .field("Time", &[("json", "time")], Ts, |o| (&o.time).into())
    }
}
