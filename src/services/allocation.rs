// src/services/allocation.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::common::money::{self, parse_money};
use crate::models::party::{NamedParty, ShareUpdate};

// Alocação de participações: converte o percentual digitado de cada
// parte em valor monetário contra o purchase_amount do negócio.
// Tudo aqui é puro e re-executável; arredondamento só acontece na
// montagem do corpo de gravação (`build_share_updates`).

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Núcleo da alocação, já com operandos numéricos.
/// Entrada fora da faixa não derruba nada: percentual negativo vira 0 e
/// acima de 100 sofre clamp, porque quem chama não é confiável.
pub fn allocate_decimal(percentage: Decimal, purchase_amount: Decimal) -> Decimal {
    if purchase_amount <= Decimal::ZERO || percentage <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let pct = percentage.min(HUNDRED);
    purchase_amount * pct / HUNDRED
}

/// Versão de fronteira: aceita o percentual como texto do input e o
/// valor de compra como string formatada ("₹1,00,000"). Qualquer
/// operando vazio ou não-parseável resulta em 0.
pub fn allocate(percentage: &str, purchase_amount: &str) -> Decimal {
    let pct_raw = percentage.trim();
    if pct_raw.is_empty() {
        return Decimal::ZERO;
    }
    let Ok(pct) = pct_raw.parse::<Decimal>() else {
        return Decimal::ZERO;
    };
    let Some(amount) = parse_money(purchase_amount) else {
        return Decimal::ZERO;
    };
    allocate_decimal(pct, amount)
}

/// Percentual efetivo de uma parte: coleção de um membro só vale 100
/// independentemente do que estiver gravado (atalho de parte única).
pub fn effective_percentage(party_count: usize, stored: Option<Decimal>) -> Decimal {
    if party_count == 1 {
        HUNDRED
    } else {
        stored.unwrap_or(Decimal::ZERO)
    }
}

/// Estado bufferizado dos percentuais em edição, chaveado por id da
/// parte. Reproduz as regras do handler de input: só inteiros, nada
/// acima de 100, e coleção de uma parte só fica travada em 100%.
/// As edições vivem aqui até o "salvar" explícito; nada é persistido
/// por conta própria.
#[derive(Debug, Clone)]
pub struct ShareEditor {
    shares: BTreeMap<i64, String>,
    single_party: bool,
}

impl ShareEditor {
    pub fn new<P: NamedParty>(parties: &[P]) -> Self {
        let single_party = parties.len() == 1;
        let mut shares = BTreeMap::new();
        for party in parties {
            let initial = if single_party {
                "100".to_string()
            } else {
                // Só aproveita o percentual armazenado quando ele é um
                // número positivo válido; o resto vira entrada vazia.
                match party.percentage_share() {
                    Some(p) if p > Decimal::ZERO => p.normalize().to_string(),
                    _ => String::new(),
                }
            };
            shares.insert(party.party_id(), initial);
        }
        Self {
            shares,
            single_party,
        }
    }

    /// Coleção de uma parte só tem o input desabilitado.
    pub fn is_locked(&self) -> bool {
        self.single_party
    }

    /// Tenta aplicar uma edição. Retorna `false` (valor anterior
    /// preservado) para: coleção travada, parte desconhecida, entrada
    /// com decimal ou caractere não-numérico, e valor acima de 100.
    pub fn apply_edit(&mut self, party_id: i64, value: &str) -> bool {
        if self.single_party {
            return false;
        }
        if !self.shares.contains_key(&party_id) {
            return false;
        }
        if !value.is_empty() {
            if !value.chars().all(|c| c.is_ascii_digit()) {
                return false;
            }
            match value.parse::<u64>() {
                Ok(n) if n <= 100 => {}
                _ => return false,
            }
        }
        self.shares.insert(party_id, value.to_string());
        true
    }

    pub fn get(&self, party_id: i64) -> &str {
        self.shares
            .get(&party_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Soma corrente dos percentuais digitados. Puramente informativa:
    /// um total diferente de 100 é exibido ao usuário mas nunca bloqueia
    /// a gravação.
    pub fn running_total(&self) -> Decimal {
        self.shares
            .values()
            .filter_map(|v| v.parse::<Decimal>().ok())
            .sum()
    }
}

/// Monta o corpo do PUT de participações: percentual e valor calculado,
/// ambos arredondados para inteiro (mesma regra do Math.round da tela).
pub fn build_share_updates<P: NamedParty>(
    parties: &[P],
    editor: &ShareEditor,
    purchase_amount: &str,
) -> Vec<ShareUpdate> {
    parties
        .iter()
        .map(|party| {
            let raw = editor.get(party.party_id());
            let percentage = raw.parse::<Decimal>().unwrap_or(Decimal::ZERO);
            let amount = allocate(raw, purchase_amount);
            ShareUpdate {
                id: party.party_id(),
                percentage_share: money::to_whole_units(percentage),
                investment_amount: money::to_whole_units(amount),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::party::Owner;
    use rust_decimal_macros::dec;

    fn owner(id: i64, name: &str, share: Option<Decimal>) -> Owner {
        Owner {
            id,
            deal_id: 1,
            name: name.to_string(),
            mobile: None,
            aadhar_card: None,
            pan_card: None,
            percentage_share: share,
            investment_amount: None,
        }
    }

    #[test]
    fn allocate_parses_formatted_purchase_amount() {
        assert_eq!(allocate("25", "₹1,00,000"), dec!(25000));
    }

    #[test]
    fn allocate_returns_zero_for_empty_or_garbage() {
        assert_eq!(allocate("", "100000"), Decimal::ZERO);
        assert_eq!(allocate("25", "abc"), Decimal::ZERO);
        assert_eq!(allocate("abc", "100000"), Decimal::ZERO);
        assert_eq!(allocate("25", ""), Decimal::ZERO);
    }

    #[test]
    fn allocate_accepts_leading_zero_percentages() {
        assert_eq!(allocate("075", "1000"), dec!(750));
    }

    #[test]
    fn allocate_clamps_out_of_range_input() {
        // O handler de input já rejeita >100, mas o alocador não confia nisso
        assert_eq!(allocate("150", "1000"), dec!(1000));
        assert_eq!(allocate("-5", "1000"), Decimal::ZERO);
    }

    #[test]
    fn allocation_is_unrounded_until_save() {
        assert_eq!(allocate_decimal(dec!(33), dec!(100)), dec!(33));
        assert_eq!(allocate_decimal(dec!(1), dec!(50)), dec!(0.5));
    }

    #[test]
    fn effective_percentage_overrides_stored_value_for_single_party() {
        assert_eq!(effective_percentage(1, Some(dec!(40))), dec!(100));
        assert_eq!(effective_percentage(1, None), dec!(100));
        assert_eq!(effective_percentage(2, Some(dec!(40))), dec!(40));
        assert_eq!(effective_percentage(2, None), Decimal::ZERO);
    }

    #[test]
    fn single_party_is_pinned_at_hundred_and_locked() {
        let parties = vec![owner(7, "Asha", Some(dec!(40)))];
        let mut editor = ShareEditor::new(&parties);
        // Percentual armazenado (40) é ignorado: parte única vale 100
        assert_eq!(editor.get(7), "100");
        assert!(editor.is_locked());
        assert!(!editor.apply_edit(7, "55"));
        assert_eq!(editor.get(7), "100");
    }

    #[test]
    fn editor_rejects_out_of_bounds_and_decimals() {
        let parties = vec![
            owner(1, "Raj", Some(dec!(60))),
            owner(2, "Meera", Some(dec!(40))),
        ];
        let mut editor = ShareEditor::new(&parties);
        assert_eq!(editor.get(1), "60");

        for bad in ["101", "-5", "12.5", "abc"] {
            assert!(!editor.apply_edit(1, bad), "should reject {bad}");
            assert_eq!(editor.get(1), "60", "value must stay unchanged after {bad}");
        }

        assert!(editor.apply_edit(1, "75"));
        assert_eq!(editor.get(1), "75");
        assert!(editor.apply_edit(1, ""));
        assert_eq!(editor.get(1), "");
    }

    #[test]
    fn running_total_is_advisory_only() {
        let parties = vec![
            owner(1, "Raj", None),
            owner(2, "Meera", None),
            owner(3, "Kiran", None),
        ];
        let mut editor = ShareEditor::new(&parties);
        assert!(editor.apply_edit(1, "60"));
        assert!(editor.apply_edit(2, "60"));
        // 120% não é erro: a soma é só um aviso na tela
        assert_eq!(editor.running_total(), dec!(120));
    }

    #[test]
    fn stale_stored_share_initializes_empty() {
        let parties = vec![
            owner(1, "Raj", Some(dec!(0))),
            owner(2, "Meera", None),
        ];
        let editor = ShareEditor::new(&parties);
        assert_eq!(editor.get(1), "");
        assert_eq!(editor.get(2), "");
    }

    #[test]
    fn share_updates_round_trip_sums_to_purchase_amount() {
        // Cenário ponta-a-ponta: 60/40 sobre 1.000.000
        let parties = vec![
            owner(1, "Raj", Some(dec!(60))),
            owner(2, "Meera", Some(dec!(40))),
        ];
        let editor = ShareEditor::new(&parties);
        let updates = build_share_updates(&parties, &editor, "1000000");

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].investment_amount, 600000);
        assert_eq!(updates[1].investment_amount, 400000);
        assert_eq!(updates[0].percentage_share, 60);
        assert_eq!(updates[1].percentage_share, 40);
        assert_eq!(
            updates.iter().map(|u| u.investment_amount).sum::<i64>(),
            1_000_000
        );
    }
}
