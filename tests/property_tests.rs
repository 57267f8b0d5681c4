mod common;

use omnikassa::application::request::PaymentRequest;
use omnikassa::application::response::{PaymentResponse, VerificationState};
use omnikassa::domain::amount;
use omnikassa::domain::currency::Currency;
use omnikassa::error::GatewayError;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn decimal_currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(
        Currency::ALL
            .into_iter()
            .filter(|currency| !currency.is_zero_decimal())
            .collect::<Vec<_>>(),
    )
}

fn decimal_amount() -> impl Strategy<Value = String> {
    (0u64..10_000_000_000, prop_oneof![
        Just(String::new()),
        (0u8..10).prop_map(|d| format!(".{d}")),
        (0u8..100).prop_map(|c| format!(".{c:02}")),
    ])
        .prop_map(|(whole, fraction)| format!("{whole}{fraction}"))
}

fn apply_setter(request: &mut PaymentRequest, step: usize) {
    let result = match step {
        0 => request
            .set_currency("EUR")
            .and_then(|r| r.set_amount("24.99"))
            .map(|_| ()),
        1 => request.set_merchant_id("002020000000001").map(|_| ()),
        2 => request
            .set_normal_return_url("https://shop.example/return")
            .map(|_| ()),
        3 => request
            .set_automatic_response_url("https://shop.example/notify")
            .map(|_| ()),
        4 => request.set_transaction_reference("TX42").map(|_| ()),
        5 => request.set_order_id("ORDER42").map(|_| ()),
        6 => request.set_key_version("1").map(|_| ()),
        7 => request.set_secret_key(common::SANDBOX_KEY).map(|_| ()),
        8 => request.set_customer_language("en").map(|_| ()),
        _ => request
            .set_payment_mean_brand_list(&["IDEAL", "VISA"])
            .map(|_| ()),
    };
    result.unwrap();
}

fn request_in_order(steps: &[usize]) -> PaymentRequest {
    let mut request = PaymentRequest::new();
    for step in steps {
        apply_setter(&mut request, *step);
    }
    request
}

proptest! {
    #[test]
    fn amount_survives_the_minor_unit_round_trip(
        currency in decimal_currency(),
        raw in decimal_amount(),
    ) {
        let minor = amount::to_minor_units(&raw, currency).unwrap();
        prop_assert!(minor.chars().all(|c| c.is_ascii_digit()));

        let back = amount::from_minor_units(&minor, currency).unwrap();
        prop_assert_eq!(
            Decimal::from_str(&back).unwrap(),
            Decimal::from_str(&raw).unwrap()
        );
    }

    #[test]
    fn yen_amounts_pass_through(whole in 0u64..1_000_000_000_000) {
        let raw = whole.to_string();
        let minor = amount::to_minor_units(&raw, Currency::Jpy).unwrap();
        prop_assert_eq!(&minor, &raw);
        prop_assert_eq!(amount::from_minor_units(&minor, Currency::Jpy).unwrap(), raw);
    }

    #[test]
    fn data_does_not_depend_on_setter_order(
        steps in Just((0..10).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let reference = request_in_order(&(0..10).collect::<Vec<_>>());
        let shuffled = request_in_order(&steps);
        prop_assert_eq!(shuffled.data().unwrap(), reference.data().unwrap());
        prop_assert_eq!(shuffled.seal().unwrap(), reference.seal().unwrap());
    }

    #[test]
    fn seal_changes_with_the_amount(a in 1u32..100_000, b in 1u32..100_000) {
        prop_assume!(a != b);
        let mut first = common::reference_request();
        let mut second = common::reference_request();
        first.set_amount(&a.to_string()).unwrap();
        second.set_amount(&b.to_string()).unwrap();
        prop_assert_ne!(first.seal().unwrap(), second.seal().unwrap());
    }

    #[test]
    fn seal_changes_with_the_references(
        order_a in "[A-Za-z0-9]{1,32}",
        order_b in "[A-Za-z0-9]{1,32}",
        reference_a in "[A-Za-z0-9]{1,32}",
        reference_b in "[A-Za-z0-9]{1,32}",
    ) {
        let mut first = common::reference_request();
        let mut second = common::reference_request();
        first.set_order_id(&order_a).unwrap();
        second.set_order_id(&order_b).unwrap();
        prop_assert_eq!(
            order_a == order_b,
            first.seal().unwrap() == second.seal().unwrap()
        );

        let mut first = common::reference_request();
        let mut second = common::reference_request();
        first.set_transaction_reference(&reference_a).unwrap();
        second.set_transaction_reference(&reference_b).unwrap();
        prop_assert_eq!(
            reference_a == reference_b,
            first.seal().unwrap() == second.seal().unwrap()
        );
    }

    #[test]
    fn seal_changes_with_the_urls(
        path_a in "[a-z0-9/]{1,40}",
        path_b in "[a-z0-9/]{1,40}",
    ) {
        prop_assume!(path_a != path_b);
        let url_a = format!("https://shop.example/{path_a}");
        let url_b = format!("https://shop.example/{path_b}");

        let mut first = common::reference_request();
        let mut second = common::reference_request();
        first.set_normal_return_url(&url_a).unwrap();
        second.set_normal_return_url(&url_b).unwrap();
        prop_assert_ne!(first.seal().unwrap(), second.seal().unwrap());

        let mut first = common::reference_request();
        let mut second = common::reference_request();
        first.set_automatic_response_url(&url_a).unwrap();
        second.set_automatic_response_url(&url_b).unwrap();
        prop_assert_ne!(first.seal().unwrap(), second.seal().unwrap());
    }

    #[test]
    fn amount_without_currency_is_out_of_sequence(raw in decimal_amount()) {
        let mut request = PaymentRequest::new();
        prop_assert!(matches!(
            request.set_amount(&raw),
            Err(GatewayError::Sequencing(_))
        ));
        prop_assert!(request.order().amount().is_none());
    }

    #[test]
    fn any_tampering_is_detected(
        cents in 1u32..1_000_000,
        position in any::<prop::sample::Index>(),
        replacement in "[a-z0-9=|]",
    ) {
        let data = format!("amount={cents}|currencyCode=978|orderId=P1|responseCode=00");
        let seal = common::sandbox_seal(&data);

        let at = position.index(data.len());
        let mut tampered = data.clone();
        tampered.replace_range(at..at + 1, &replacement);
        prop_assume!(tampered != data);

        let mut response = PaymentResponse::new(tampered, seal.clone());
        response.enable_test_mode();
        prop_assert!(matches!(response.validate(), Err(GatewayError::Integrity)));
        prop_assert_eq!(response.state(), VerificationState::Rejected);
        prop_assert!(response.amount().is_none());
        prop_assert!(response.merchant_id().is_none());
        prop_assert!(response.key_version().is_none());

        let mut forged = PaymentResponse::new(data, seal.to_uppercase());
        forged.enable_test_mode();
        prop_assert!(forged.validate().is_err());
    }
}
