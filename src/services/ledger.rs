// src/services/ledger.rs

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::payment::{LedgerParams, Payment};
use crate::services::reconciliation::{resolve_party_name, PartyDirectory, PartyField};

// Pipeline de filtro/ordenação do razão de pagamentos. Derivação pura
// de camada de visão: recebe o snapshot, o instante de avaliação e a
// consulta, e devolve a lista filtrada, sem nenhum efeito persistido.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    // Derivado: pending com due_date estritamente no passado
    Overdue,
    Stored(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeFilter {
    All,
    Today,
    // Janela móvel dos últimos 7 dias, não semana de calendário
    ThisWeek,
    ThisMonth,
    ThisYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    AmountAsc,
    AmountDesc,
    DateAsc,
    DateDesc,
    Status,
}

#[derive(Debug, Clone)]
pub struct LedgerQuery {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub payment_type: Option<String>,
    pub date_range: DateRangeFilter,
    pub investor_id: Option<i64>,
    pub investor_name: Option<String>,
    pub sort_by: SortKey,
}

impl LedgerQuery {
    /// Traduz a query string crua para os tipos do pipeline. Valor
    /// desconhecido em qualquer filtro cai no default ("all" /
    /// date_desc) em vez de virar erro.
    pub fn from_params(params: &LedgerParams, dir: &PartyDirectory) -> Self {
        let status = match params.status.as_deref() {
            None | Some("all") | Some("") => StatusFilter::All,
            Some("overdue") => StatusFilter::Overdue,
            Some(other) => StatusFilter::Stored(other.to_string()),
        };

        let date_range = match params.date_range.as_deref() {
            Some("today") => DateRangeFilter::Today,
            Some("this_week") => DateRangeFilter::ThisWeek,
            Some("this_month") => DateRangeFilter::ThisMonth,
            Some("this_year") => DateRangeFilter::ThisYear,
            _ => DateRangeFilter::All,
        };

        let sort_by = match params.sort_by.as_deref() {
            Some("amount_asc") => SortKey::AmountAsc,
            Some("amount_desc") => SortKey::AmountDesc,
            Some("date_asc") => SortKey::DateAsc,
            Some("status") => SortKey::Status,
            _ => SortKey::DateDesc,
        };

        let investor_name = params.investor_id.and_then(|id| {
            dir.investors
                .iter()
                .find(|i| i.id == id)
                .map(|i| i.display_name.clone())
        });

        Self {
            search: params
                .search
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status,
            payment_type: params
                .payment_type
                .clone()
                .filter(|t| !t.is_empty() && t != "all"),
            date_range,
            investor_id: params.investor_id,
            investor_name,
            sort_by,
        }
    }
}

/// Um pagamento está vencido quando o status armazenado é pending e a
/// due_date é estritamente anterior ao dia da avaliação.
pub fn is_overdue(payment: &Payment, today: NaiveDate) -> bool {
    payment.status == "pending" && payment.due_date.is_some_and(|due| due < today)
}

fn matches_status(payment: &Payment, filter: &StatusFilter, today: NaiveDate) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Overdue => is_overdue(payment, today),
        // "pending" e "overdue" são visões mutuamente exclusivas do
        // mesmo status gravado: o filtro pending não mostra vencidos.
        StatusFilter::Stored(s) if s == "pending" => {
            payment.status == "pending" && !is_overdue(payment, today)
        }
        StatusFilter::Stored(s) => payment.status == *s,
    }
}

fn matches_date_range(payment: &Payment, range: DateRangeFilter, today: NaiveDate) -> bool {
    if range == DateRangeFilter::All {
        return true;
    }
    // Sem payment_date não há como cair em nenhuma janela específica
    let Some(date) = payment.payment_date else {
        return false;
    };
    match range {
        DateRangeFilter::All => true,
        DateRangeFilter::Today => date == today,
        DateRangeFilter::ThisWeek => {
            let week_ago = today.checked_sub_days(Days::new(7)).unwrap_or(today);
            date >= week_ago
        }
        DateRangeFilter::ThisMonth => date.month() == today.month() && date.year() == today.year(),
        DateRangeFilter::ThisYear => date.year() == today.year(),
    }
}

fn matches_search(payment: &Payment, term: &str, dir: &PartyDirectory) -> bool {
    let needle = term.to_lowercase();
    let amount_text = payment.amount.to_string();
    let resolved_by = resolve_party_name(payment, PartyField::PaidBy, dir);
    let resolved_to = resolve_party_name(payment, PartyField::PaidTo, dir);

    let haystack: [Option<&str>; 16] = [
        payment.description.as_deref(),
        payment.reference.as_deref(),
        payment.transaction_id.as_deref(),
        payment.notes.as_deref(),
        payment.category.as_deref(),
        payment.paid_to.as_deref(),
        payment.paid_by.as_deref(),
        Some(resolved_to.as_str()),
        Some(resolved_by.as_str()),
        payment.payer_bank_name.as_deref(),
        payment.payer_bank_account_no.as_deref(),
        payment.receiver_bank_name.as_deref(),
        payment.receiver_bank_account_no.as_deref(),
        payment.payment_mode.as_deref(),
        payment.payment_type.as_deref(),
        Some(amount_text.as_str()),
    ];

    haystack
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn matches_investor(payment: &Payment, query: &LedgerQuery, dir: &PartyDirectory) -> bool {
    let Some(investor_id) = query.investor_id else {
        return true;
    };
    let token = format!("investor_{investor_id}");
    let raw_hit = payment
        .paid_by
        .as_deref()
        .is_some_and(|v| v.contains(&token))
        || payment.paid_to.as_deref().is_some_and(|v| v.contains(&token));
    if raw_hit {
        return true;
    }
    // Igualdade exata com o nome resolvido do investidor selecionado
    query.investor_name.as_deref().is_some_and(|name| {
        resolve_party_name(payment, PartyField::PaidBy, dir) == name
            || resolve_party_name(payment, PartyField::PaidTo, dir) == name
    })
}

fn sort_date(payment: &Payment) -> NaiveDate {
    // Data ausente ordena como a época (1970-01-01, o Default de NaiveDate)
    payment.payment_date.unwrap_or_default()
}

fn sort_amount(payment: &Payment) -> Decimal {
    payment.amount
}

/// Aplica busca, status (incluindo o derivado "overdue"), tipo, janela
/// de datas e filtro de investidor, e ordena de forma estável.
/// `now` é parâmetro explícito para a derivação continuar pura.
pub fn filter_and_sort(
    payments: Vec<Payment>,
    query: &LedgerQuery,
    dir: &PartyDirectory,
    now: DateTime<Utc>,
) -> Vec<Payment> {
    let today = now.date_naive();

    let mut filtered: Vec<Payment> = payments
        .into_iter()
        .filter(|p| {
            let search_ok = query
                .search
                .as_deref()
                .map_or(true, |term| matches_search(p, term, dir));
            let type_ok = query
                .payment_type
                .as_deref()
                .map_or(true, |t| p.payment_type.as_deref() == Some(t));

            search_ok
                && type_ok
                && matches_status(p, &query.status, today)
                && matches_date_range(p, query.date_range, today)
                && matches_investor(p, query, dir)
        })
        .collect();

    // `sort_by` de slice é estável: chaves iguais preservam a ordem de chegada
    match query.sort_by {
        SortKey::AmountAsc => filtered.sort_by(|a, b| sort_amount(a).cmp(&sort_amount(b))),
        SortKey::AmountDesc => filtered.sort_by(|a, b| sort_amount(b).cmp(&sort_amount(a))),
        SortKey::DateAsc => filtered.sort_by(|a, b| sort_date(a).cmp(&sort_date(b))),
        SortKey::DateDesc => filtered.sort_by(|a, b| sort_date(b).cmp(&sort_date(a))),
        SortKey::Status => filtered.sort_by(|a, b| a.status.cmp(&b.status)),
    }

    filtered
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

    fn at(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        at(2025, 6, 15).and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn query(status: StatusFilter) -> LedgerQuery {
        LedgerQuery {
            search: None,
            status,
            payment_type: None,
            date_range: DateRangeFilter::All,
            investor_id: None,
            investor_name: None,
            sort_by: SortKey::DateDesc,
        }
    }

    #[test]
    fn overdue_is_derived_from_pending_plus_past_due_date() {
        let dir = PartyDirectory::default();
        let mut overdue = payment(1, dec!(100), "pending");
        overdue.due_date = Some(at(2025, 6, 14)); // ontem
        let mut future = payment(2, dec!(100), "pending");
        future.due_date = Some(at(2025, 6, 20));
        let mut completed = payment(3, dec!(100), "completed");
        completed.due_date = Some(at(2025, 6, 1));

        let result = filter_and_sort(
            vec![overdue.clone(), future.clone(), completed],
            &query(StatusFilter::Overdue),
            &dir,
            now(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);

        // Visões mutuamente exclusivas: o filtro pending exclui o vencido
        let result = filter_and_sort(
            vec![overdue, future],
            &query(StatusFilter::Stored("pending".to_string())),
            &dir,
            now(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn due_today_is_not_overdue_yet() {
        let mut p = payment(1, dec!(100), "pending");
        p.due_date = Some(at(2025, 6, 15));
        assert!(!is_overdue(&p, at(2025, 6, 15)));
        assert!(is_overdue(&p, at(2025, 6, 16)));
    }

    #[test]
    fn date_windows_anchor_on_evaluation_time() {
        let dir = PartyDirectory::default();
        let mut today_p = payment(1, dec!(1), "completed");
        today_p.payment_date = Some(at(2025, 6, 15));
        let mut week_p = payment(2, dec!(1), "completed");
        week_p.payment_date = Some(at(2025, 6, 9));
        let mut month_p = payment(3, dec!(1), "completed");
        month_p.payment_date = Some(at(2025, 6, 1));
        let mut last_year = payment(4, dec!(1), "completed");
        last_year.payment_date = Some(at(2024, 6, 15));
        let undated = payment(5, dec!(1), "completed");

        let all = vec![today_p, week_p, month_p, last_year, undated];

        let mut q = query(StatusFilter::All);
        q.date_range = DateRangeFilter::Today;
        let r = filter_and_sort(all.clone(), &q, &dir, now());
        assert_eq!(r.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);

        // Janela móvel de 7 dias: 09/06 entra, 01/06 não
        q.date_range = DateRangeFilter::ThisWeek;
        let mut ids: Vec<i64> = filter_and_sort(all.clone(), &q, &dir, now())
            .iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);

        q.date_range = DateRangeFilter::ThisMonth;
        let mut ids: Vec<i64> = filter_and_sort(all.clone(), &q, &dir, now())
            .iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);

        q.date_range = DateRangeFilter::ThisYear;
        let mut ids: Vec<i64> = filter_and_sort(all, &q, &dir, now())
            .iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn search_covers_resolved_names_and_amount_text() {
        let dir = PartyDirectory {
            investors: vec![crate::services::reconciliation::PartyRef {
                id: 7,
                display_name: "Asha".to_string(),
            }],
            ..Default::default()
        };
        let mut p = payment(1, dec!(45000), "completed");
        p.paid_by = Some("investor_7".to_string());
        p.description = Some("Advance for plot 12".to_string());

        let mut q = query(StatusFilter::All);
        q.search = Some("asha".to_string());
        assert_eq!(filter_and_sort(vec![p.clone()], &q, &dir, now()).len(), 1);

        q.search = Some("45000".to_string());
        assert_eq!(filter_and_sort(vec![p.clone()], &q, &dir, now()).len(), 1);

        q.search = Some("plot 12".to_string());
        assert_eq!(filter_and_sort(vec![p.clone()], &q, &dir, now()).len(), 1);

        q.search = Some("zzz".to_string());
        assert_eq!(filter_and_sort(vec![p], &q, &dir, now()).len(), 0);
    }

    #[test]
    fn investor_filter_matches_token_or_resolved_name() {
        let dir = PartyDirectory {
            investors: vec![crate::services::reconciliation::PartyRef {
                id: 7,
                display_name: "Asha".to_string(),
            }],
            ..Default::default()
        };
        let mut by_token = payment(1, dec!(100), "completed");
        by_token.paid_by = Some("investor_7".to_string());
        let mut by_name = payment(2, dec!(100), "completed");
        by_name.paid_to_name = Some("Asha".to_string());
        let other = payment(3, dec!(100), "completed");

        let mut q = query(StatusFilter::All);
        q.investor_id = Some(7);
        q.investor_name = Some("Asha".to_string());

        let mut ids: Vec<i64> = filter_and_sort(vec![by_token, by_name, other], &q, &dir, now())
            .iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn default_sort_is_date_desc_with_missing_dates_last() {
        let dir = PartyDirectory::default();
        let mut a = payment(1, dec!(1), "completed");
        a.payment_date = Some(at(2025, 6, 1));
        let mut b = payment(2, dec!(1), "completed");
        b.payment_date = Some(at(2025, 6, 10));
        let undated = payment(3, dec!(1), "completed");

        let r = filter_and_sort(
            vec![a, undated, b],
            &query(StatusFilter::All),
            &dir,
            now(),
        );
        assert_eq!(r.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn equal_sort_keys_preserve_arrival_order() {
        let dir = PartyDirectory::default();
        let mut ps = Vec::new();
        for id in 1..=4 {
            let mut p = payment(id, dec!(500), "completed");
            p.payment_date = Some(at(2025, 6, 1));
            ps.push(p);
        }
        let mut q = query(StatusFilter::All);
        q.sort_by = SortKey::AmountAsc;
        let r = filter_and_sort(ps, &q, &dir, now());
        assert_eq!(r.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
