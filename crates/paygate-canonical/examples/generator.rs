use paygate_canonical::{
    CanonicalEngine, CompactionPolicy, Record, SemanticType, ShapeDescription, Timestamp,
};

struct Notify {
    out_trade_no: String,
    pay_amount: u32,
    sign: String,
    paid_at: Option<Timestamp>,
}

impl Record for Notify {
    fn shape() -> ShapeDescription<Self> {
        ShapeDescription::<Self>::new("Notify")
            .field("OutTradeNo", &[("json", "out_trade_no")], SemanticType::String, |n| {
                (&n.out_trade_no).into()
            })
            .field("PayAmount", &[("json", "pay_amount")], SemanticType::Uint32, |n| {
                n.pay_amount.into()
            })
            .field("Sign", &[("json", "sign")], SemanticType::String, |n| (&n.sign).into())
            .field("PaidAt", &[("json", "paid_at")], SemanticType::Timestamp, |n| {
                (&n.paid_at).into()
            })
    }
}

fn main() {
    let engine = CanonicalEngine::standard();
    let notify = Notify {
        out_trade_no: "T20201214000001".into(),
        pay_amount: 100,
        sign: "ignored".into(),
        paid_at: Some(Timestamp::now()),
    };

    match engine.canonicalize(&notify, "json", CompactionPolicy::signing("sign")) {
        Ok(canonical) => println!("{}", canonical),
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
