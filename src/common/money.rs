// src/common/money.rs

use rust_decimal::Decimal;

// Helpers de dinheiro/percentual usados pela camada de alocação e pelos
// payloads da API. Valores monetários chegam do cliente em qualquer
// formato ("₹1,00,000", "1000000", 1000000) e são normalizados aqui,
// na fronteira do modelo. As camadas internas só enxergam `Decimal`.

/// Remove tudo que não for dígito ou ponto decimal ("₹1,00,000.50" -> "100000.50").
pub fn clean_amount(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Interpreta um valor monetário vindo como texto formatado.
/// Retorna `None` quando não sobra nada parseável após a limpeza.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned = clean_amount(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Arredonda para a unidade monetária inteira (sem centavos), com o
/// mesmo comportamento do `Math.round` usado na camada de exibição.
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// `round_to_unit` convertido para inteiro, para os corpos de requisição
/// que trafegam `investment_amount` como número inteiro.
pub fn to_whole_units(value: Decimal) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    round_to_unit(value).to_i64().unwrap_or(0)
}

/// Desserializador tolerante para campos monetários opcionais: aceita
/// número JSON, string formatada ou null. Valor não-parseável vira zero
/// em vez de derrubar a requisição inteira.
pub fn lenient_option<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => {
            Some(n.to_string().parse::<Decimal>().unwrap_or(Decimal::ZERO))
        }
        Some(serde_json::Value::String(s)) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(parse_money(&s).unwrap_or(Decimal::ZERO))
            }
        }
        Some(_) => Some(Decimal::ZERO),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn clean_amount_strips_currency_and_separators() {
        assert_eq!(clean_amount("₹1,00,000"), "100000");
        assert_eq!(clean_amount("1 000 000.50"), "1000000.50");
        assert_eq!(clean_amount("abc"), "");
    }

    #[test]
    fn parse_money_handles_formatted_input() {
        assert_eq!(parse_money("₹1,00,000"), Some(dec!(100000)));
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money(""), None);
    }

    #[test]
    fn round_to_unit_matches_math_round() {
        assert_eq!(round_to_unit(dec!(2.5)), dec!(3));
        assert_eq!(round_to_unit(dec!(2.4)), dec!(2));
        assert_eq!(to_whole_units(dec!(599999.5)), 600000);
    }

    #[derive(serde::Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "lenient_option")]
        amount: Option<Decimal>,
    }

    #[test]
    fn lenient_field_accepts_number_string_and_garbage() {
        let p: Payload = serde_json::from_value(serde_json::json!({"amount": 5000})).unwrap();
        assert_eq!(p.amount, Some(dec!(5000)));

        let p: Payload =
            serde_json::from_value(serde_json::json!({"amount": "₹1,00,000"})).unwrap();
        assert_eq!(p.amount, Some(dec!(100000)));

        // Lixo vira zero em vez de rejeitar a requisição: o registro
        // continua existindo (e contando) na conciliação
        let p: Payload = serde_json::from_value(serde_json::json!({"amount": "abc"})).unwrap();
        assert_eq!(p.amount, Some(Decimal::ZERO));

        let p: Payload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(p.amount, None);

        let p: Payload = serde_json::from_value(serde_json::json!({"amount": null})).unwrap();
        assert_eq!(p.amount, None);
    }
}
