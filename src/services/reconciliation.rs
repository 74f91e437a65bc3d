// src/services/reconciliation.rs

use rust_decimal::Decimal;

use crate::models::party::{Buyer, Investor, NamedParty, Owner};
use crate::models::payment::Payment;

// Conciliação do razão de pagamentos contra as partes do negócio:
// resolução de nome de pagador/recebedor e totais derivados por parte.
// Todas as funções são puras e totais: registro malformado degrada
// para um default seguro ("N/A", valor cru, 0) e nunca derruba a
// agregação da lista inteira.

/// Forma canônica de uma parte, já normalizada na fronteira do modelo.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyRef {
    pub id: i64,
    pub display_name: String,
}

impl PartyRef {
    pub fn from_party<P: NamedParty>(party: &P) -> Self {
        Self {
            id: party.party_id(),
            display_name: party.display_name().to_string(),
        }
    }
}

/// As três coleções contra as quais tokens e ids crus são resolvidos.
#[derive(Debug, Default, Clone)]
pub struct PartyDirectory {
    pub investors: Vec<PartyRef>,
    pub owners: Vec<PartyRef>,
    pub buyers: Vec<PartyRef>,
}

impl PartyDirectory {
    pub fn new(investors: &[Investor], owners: &[Owner], buyers: &[Buyer]) -> Self {
        Self {
            investors: investors.iter().map(PartyRef::from_party).collect(),
            owners: owners.iter().map(PartyRef::from_party).collect(),
            buyers: buyers.iter().map(PartyRef::from_party).collect(),
        }
    }

    fn name_by_id<'a>(list: &'a [PartyRef], id: i64) -> Option<&'a str> {
        list.iter()
            .find(|p| p.id == id)
            .map(|p| p.display_name.as_str())
    }
}

/// De qual lado do pagamento estamos falando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyField {
    PaidBy,
    PaidTo,
}

impl PartyField {
    fn precomputed_name(self, payment: &Payment) -> Option<&str> {
        match self {
            PartyField::PaidBy => payment.paid_by_name.as_deref(),
            PartyField::PaidTo => payment.paid_to_name.as_deref(),
        }
    }

    fn raw_value(self, payment: &Payment) -> Option<&str> {
        match self {
            PartyField::PaidBy => payment.paid_by.as_deref(),
            PartyField::PaidTo => payment.paid_to.as_deref(),
        }
    }

    fn linked_id(self, payment: &Payment) -> Option<i64> {
        match self {
            PartyField::PaidBy => payment.paid_by_id,
            PartyField::PaidTo => payment.paid_to_id,
        }
    }
}

/// Resolve o nome de exibição de pagador/recebedor, na ordem:
/// 1. campo *_name pré-resolvido;
/// 2. valor cru ausente -> "N/A";
/// 3. token "{tipo}_{id}" contra a coleção do tipo;
/// 4. id numérico puro contra investors -> owners -> buyers;
/// 5. valor cru ecoado de volta.
/// Nunca falha e nunca retorna vazio.
pub fn resolve_party_name(payment: &Payment, field: PartyField, dir: &PartyDirectory) -> String {
    if let Some(name) = field.precomputed_name(payment) {
        if !name.is_empty() {
            return name.to_string();
        }
    }

    let Some(raw) = field.raw_value(payment).filter(|v| !v.is_empty()) else {
        return "N/A".to_string();
    };

    // Token codificado "investor_42" / "owner_7" / "buyer_3"
    if let Some((kind, id_str)) = raw.split_once('_') {
        if let Ok(id) = id_str.parse::<i64>() {
            let hit = match kind {
                "investor" => PartyDirectory::name_by_id(&dir.investors, id),
                "owner" => PartyDirectory::name_by_id(&dir.owners, id),
                "buyer" => PartyDirectory::name_by_id(&dir.buyers, id),
                _ => None,
            };
            if let Some(name) = hit {
                return name.to_string();
            }
        }
        return raw.to_string();
    }

    // Registro legado: id numérico sem prefixo de tipo. A prioridade
    // investors -> owners -> buyers é regra de compatibilidade herdada;
    // ids que colidem entre coleções resolvem para o investidor.
    if let Ok(id) = raw.parse::<i64>() {
        for list in [&dir.investors, &dir.owners, &dir.buyers] {
            if let Some(name) = PartyDirectory::name_by_id(list, id) {
                return name.to_string();
            }
        }
    }

    raw.to_string()
}

/// Comparação de status sempre indiferente a maiúsculas: a base herdada
/// tem registros com capitalização variada.
pub fn is_completed(status: &str) -> bool {
    status.eq_ignore_ascii_case("completed")
}

/// Totais derivados de uma parte. Cache de exibição, nunca fonte de
/// verdade: recalculado a cada mudança em pagamentos ou partes.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyTotals {
    pub party_id: i64,
    pub calculated_investment_amount: Decimal,
    pub payment_count: i64,
}

fn payment_matches(
    payment: &Payment,
    party: &PartyRef,
    field: PartyField,
    dir: &PartyDirectory,
) -> bool {
    if !is_completed(&payment.status) {
        return false;
    }
    match field.linked_id(payment) {
        // Caminho preferencial: vínculo por id
        Some(id) => id == party.id,
        // Compatibilidade: casa pelo nome resolvido
        None => resolve_party_name(payment, field, dir) == party.display_name,
    }
}

fn recompute_totals_for_field(
    parties: &[PartyRef],
    payments: &[Payment],
    field: PartyField,
    dir: &PartyDirectory,
) -> Vec<PartyTotals> {
    parties
        .iter()
        .map(|party| {
            let mut total = Decimal::ZERO;
            let mut count = 0i64;
            for payment in payments {
                if payment_matches(payment, party, field, dir) {
                    total += payment.amount;
                    count += 1;
                }
            }
            PartyTotals {
                party_id: party.id,
                calculated_investment_amount: total,
                payment_count: count,
            }
        })
        .collect()
}

/// Total investido (lado pagador) por parte. Determinística e
/// idempotente: mesmas entradas, mesma saída.
pub fn recompute_party_totals(
    parties: &[PartyRef],
    payments: &[Payment],
    dir: &PartyDirectory,
) -> Vec<PartyTotals> {
    recompute_totals_for_field(parties, payments, PartyField::PaidBy, dir)
}

/// Total recebido (lado recebedor) por parte, usado na visão de
/// acompanhamento dos proprietários.
pub fn recompute_received_totals(
    parties: &[PartyRef],
    payments: &[Payment],
    dir: &PartyDirectory,
) -> Vec<PartyTotals> {
    recompute_totals_for_field(parties, payments, PartyField::PaidTo, dir)
}

/// Substitui os totais correntes apenas quando algo de fato mudou.
/// Retorna `false` (estado intocado) para saída idêntica, para que o
/// chamador reativo possa pular a re-renderização.
pub fn apply_totals(current: &mut Vec<PartyTotals>, new: Vec<PartyTotals>) -> bool {
    if *current == new {
        return false;
    }
    *current = new;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payment(id: i64, amount: Decimal, status: &str) -> Payment {
        Payment {
            id,
            deal_id: 1,
            amount,
            payment_date: None,
            due_date: None,
            status: status.to_string(),
            payment_type: None,
            payment_mode: None,
            paid_by: None,
            paid_to: None,
            paid_by_id: None,
            paid_to_id: None,
            paid_by_name: None,
            paid_to_name: None,
            description: None,
            reference: None,
            transaction_id: None,
            notes: None,
            category: None,
            payer_bank_name: None,
            payer_bank_account_no: None,
            receiver_bank_name: None,
            receiver_bank_account_no: None,
            created_by: None,
            created_at: chrono::DateTime::UNIX_EPOCH,
        }
    }

    fn directory() -> PartyDirectory {
        PartyDirectory {
            investors: vec![PartyRef {
                id: 7,
                display_name: "Asha".to_string(),
            }],
            owners: vec![PartyRef {
                id: 3,
                display_name: "Raj".to_string(),
            }],
            buyers: vec![PartyRef {
                id: 5,
                display_name: "Kiran".to_string(),
            }],
        }
    }

    #[test]
    fn precomputed_name_wins_over_everything() {
        let mut p = payment(1, dec!(100), "completed");
        p.paid_by_name = Some("Raj".to_string());
        p.paid_by = Some("investor_7".to_string());
        assert_eq!(
            resolve_party_name(&p, PartyField::PaidBy, &directory()),
            "Raj"
        );
    }

    #[test]
    fn missing_raw_value_yields_na() {
        let p = payment(1, dec!(100), "completed");
        assert_eq!(
            resolve_party_name(&p, PartyField::PaidBy, &directory()),
            "N/A"
        );
    }

    #[test]
    fn encoded_token_resolves_against_typed_collection() {
        let mut p = payment(1, dec!(100), "completed");
        p.paid_by = Some("investor_7".to_string());
        assert_eq!(
            resolve_party_name(&p, PartyField::PaidBy, &directory()),
            "Asha"
        );

        p.paid_to = Some("owner_3".to_string());
        assert_eq!(
            resolve_party_name(&p, PartyField::PaidTo, &directory()),
            "Raj"
        );
    }

    #[test]
    fn unmatched_token_echoes_raw_value() {
        let mut p = payment(1, dec!(100), "completed");
        p.paid_by = Some("investor_99".to_string());
        assert_eq!(
            resolve_party_name(&p, PartyField::PaidBy, &directory()),
            "investor_99"
        );

        // Tipo desconhecido também ecoa o valor cru
        p.paid_by = Some("bank_1".to_string());
        assert_eq!(
            resolve_party_name(&p, PartyField::PaidBy, &directory()),
            "bank_1"
        );
    }

    #[test]
    fn bare_numeric_id_checks_investors_then_owners_then_buyers() {
        let mut dir = directory();
        let mut p = payment(1, dec!(100), "completed");

        p.paid_by = Some("3".to_string());
        assert_eq!(resolve_party_name(&p, PartyField::PaidBy, &dir), "Raj");

        // Colisão de id entre coleções: o investidor ganha
        dir.investors.push(PartyRef {
            id: 3,
            display_name: "Meera".to_string(),
        });
        assert_eq!(resolve_party_name(&p, PartyField::PaidBy, &dir), "Meera");

        p.paid_by = Some("99".to_string());
        assert_eq!(resolve_party_name(&p, PartyField::PaidBy, &dir), "99");
    }

    #[test]
    fn totals_count_only_completed_payments_for_the_party() {
        let dir = PartyDirectory::default();
        let parties = vec![
            PartyRef {
                id: 1,
                display_name: "Asha".to_string(),
            },
            PartyRef {
                id: 2,
                display_name: "Raj".to_string(),
            },
        ];
        let mut p1 = payment(1, dec!(5000), "completed");
        p1.paid_by_id = Some(1);
        let mut p2 = payment(2, dec!(3000), "pending");
        p2.paid_by_id = Some(1);
        let mut p3 = payment(3, dec!(1000), "completed");
        p3.paid_by_id = Some(2);

        let totals = recompute_party_totals(&parties, &[p1, p2, p3], &dir);
        assert_eq!(totals[0].calculated_investment_amount, dec!(5000));
        assert_eq!(totals[0].payment_count, 1);
        assert_eq!(totals[1].calculated_investment_amount, dec!(1000));
        assert_eq!(totals[1].payment_count, 1);
    }

    #[test]
    fn name_fallback_matches_case_insensitive_status() {
        let dir = directory();
        let parties = vec![PartyRef {
            id: 7,
            display_name: "Asha".to_string(),
        }];
        let mut p = payment(1, dec!(2500), "COMPLETED");
        p.paid_by = Some("investor_7".to_string());

        let totals = recompute_party_totals(&parties, &[p], &dir);
        assert_eq!(totals[0].calculated_investment_amount, dec!(2500));
        assert_eq!(totals[0].payment_count, 1);
    }

    #[test]
    fn empty_inputs_degrade_safely() {
        let dir = PartyDirectory::default();
        assert!(recompute_party_totals(&[], &[], &dir).is_empty());

        let parties = vec![PartyRef {
            id: 1,
            display_name: "Asha".to_string(),
        }];
        let totals = recompute_party_totals(&parties, &[], &dir);
        assert_eq!(totals[0].calculated_investment_amount, Decimal::ZERO);
        assert_eq!(totals[0].payment_count, 0);
    }

    #[test]
    fn recompute_is_idempotent_and_apply_skips_no_op() {
        let dir = directory();
        let parties = vec![PartyRef {
            id: 7,
            display_name: "Asha".to_string(),
        }];
        let mut p = payment(1, dec!(5000), "completed");
        p.paid_by_id = Some(7);
        let payments = vec![p];

        let first = recompute_party_totals(&parties, &payments, &dir);
        let second = recompute_party_totals(&parties, &payments, &dir);
        assert_eq!(first, second);

        let mut state = Vec::new();
        assert!(apply_totals(&mut state, first));
        // Segunda aplicação com a mesma saída não mexe no estado
        assert!(!apply_totals(&mut state, second));
    }
}
