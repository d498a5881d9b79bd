//! Remove o ruído de pagamentos e reembolsos para o ledger mostrar só o gasto líquido.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::types::Transaction;

/// Tolerância absoluta ao comparar um crédito com um débito: 0.01.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub transactions: Vec<Transaction>,
    pub payments_removed: usize,
    pub reimbursements_removed: usize,
}

/// Remoção de pagamentos seguida do cancelamento crédito/débito.
pub fn reconcile(ledger: Vec<Transaction>, tolerance: Decimal) -> Reconciliation {
    let (without_payments, payments_removed) = drop_payments(ledger);
    let (transactions, reimbursements_removed) =
        reconcile_reimbursements(without_payments, tolerance);

    log::info!(
        "Cleaning: dropped {payments_removed} payments and {reimbursements_removed} \
         reimbursed/refunded rows. Remaining expenses: {}",
        transactions.len()
    );

    Reconciliation {
        transactions,
        payments_removed,
        reimbursements_removed,
    }
}

pub fn drop_payments(ledger: Vec<Transaction>) -> (Vec<Transaction>, usize) {
    let before = ledger.len();
    let kept: Vec<Transaction> = ledger.into_iter().filter(|txn| !txn.is_payment).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Cancela cada crédito com o primeiro débito ainda livre de descrição
/// idêntica e magnitude dentro de `tolerance`, na ordem do ledger.
///
/// Os dois lados de um par são descartados. Créditos sem par também;
/// débitos só saem quando pareados.
pub fn reconcile_reimbursements(
    ledger: Vec<Transaction>,
    tolerance: Decimal,
) -> (Vec<Transaction>, usize) {
    let mut debits_by_description: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, txn) in ledger.iter().enumerate().filter(|(_, t)| t.is_debit()) {
        debits_by_description
            .entry(txn.description.as_str())
            .or_default()
            .push(idx);
    }

    let mut to_drop: HashSet<usize> = HashSet::new();
    for (credit_idx, credit) in ledger.iter().enumerate().filter(|(_, t)| t.is_credit()) {
        let matched = debits_by_description
            .get(credit.description.as_str())
            .and_then(|candidates| {
                candidates.iter().copied().find(|debit_idx| {
                    !to_drop.contains(debit_idx)
                        && (ledger[*debit_idx].amount + credit.amount).abs() <= tolerance
                })
            });

        if let Some(debit_idx) = matched {
            log::debug!(
                "reconciled '{}' {} against {}",
                credit.description,
                credit.amount,
                ledger[debit_idx].amount
            );
            to_drop.insert(debit_idx);
        }
        to_drop.insert(credit_idx);
    }

    let removed = to_drop.len();
    let kept = ledger
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !to_drop.contains(idx))
        .map(|(_, txn)| txn)
        .collect();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn txn(description: &str, amount: &str, is_payment: bool) -> Transaction {
        Transaction {
            source_file: "statement.pdf".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            posted_date: None,
            transaction_date_raw: None,
            posted_date_raw: None,
            description: description.to_string(),
            description_raw: description.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            is_payment,
            parser: "td".to_string(),
        }
    }

    fn amounts(ledger: &[Transaction]) -> Vec<String> {
        ledger.iter().map(|t| t.amount.to_string()).collect()
    }

    #[test]
    fn test_default_tolerance() {
        assert_eq!(DEFAULT_TOLERANCE, Decimal::from_str("0.01").unwrap());
    }

    #[test]
    fn test_drop_payments() {
        let ledger = vec![txn("PAYMENT", "-100", true), txn("STORE", "50", false)];
        let (cleaned, removed) = drop_payments(ledger);
        assert_eq!(removed, 1);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].description, "STORE");
    }

    #[test]
    fn test_reconcile_reimbursements_matches_and_drops() {
        let ledger = vec![
            txn("STORE A", "100.00", false),
            txn("STORE A", "-100.00", false),
            txn("STORE B", "25.00", false),
        ];
        let (cleaned, removed) = reconcile_reimbursements(ledger, DEFAULT_TOLERANCE);
        assert_eq!(removed, 2);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].description, "STORE B");
        assert_eq!(cleaned[0].amount, Decimal::from_str("25.00").unwrap());
    }

    #[test]
    fn test_reconcile_reimbursements_drops_unmatched_credit() {
        let ledger = vec![txn("STORE A", "50.0", false), txn("REFUND X", "-20.0", false)];
        let (cleaned, removed) = reconcile_reimbursements(ledger, DEFAULT_TOLERANCE);
        assert_eq!(removed, 1);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].amount, Decimal::from_str("50.0").unwrap());
    }

    #[test]
    fn test_match_within_tolerance_only() {
        let ledger = vec![
            txn("STORE", "10.00", false),
            txn("STORE", "-10.01", false),
            txn("SHOP", "10.00", false),
            txn("SHOP", "-10.02", false),
        ];
        let (cleaned, removed) = reconcile_reimbursements(ledger, DEFAULT_TOLERANCE);
        assert_eq!(removed, 3);
        assert_eq!(amounts(&cleaned), vec!["10.00"]);
        assert_eq!(cleaned[0].description, "SHOP");
    }

    #[test]
    fn test_description_must_match_exactly() {
        let ledger = vec![txn("STORE A", "40.00", false), txn("store a", "-40.00", false)];
        let (cleaned, removed) = reconcile_reimbursements(ledger, DEFAULT_TOLERANCE);
        assert_eq!(removed, 1);
        assert_eq!(cleaned[0].description, "STORE A");
    }

    #[test]
    fn test_first_unconsumed_debit_wins() {
        let ledger = vec![
            txn("STORE", "30.01", false),
            txn("STORE", "30.00", false),
            txn("STORE", "-30.00", false),
        ];
        let (cleaned, removed) = reconcile_reimbursements(ledger, DEFAULT_TOLERANCE);
        assert_eq!(removed, 2);
        // order decides, not distance: the exact 30.00 debit survives
        assert_eq!(amounts(&cleaned), vec!["30.00"]);
    }

    #[test]
    fn test_credit_before_debit_still_matches() {
        let ledger = vec![txn("STORE", "-15.00", false), txn("STORE", "15.00", false)];
        let (cleaned, removed) = reconcile_reimbursements(ledger, DEFAULT_TOLERANCE);
        assert_eq!(removed, 2);
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_zero_amount_rows_are_kept() {
        let ledger = vec![txn("FEE WAIVED", "0.00", false)];
        let (cleaned, removed) = reconcile_reimbursements(ledger, DEFAULT_TOLERANCE);
        assert_eq!(removed, 0);
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn test_reconcile_runs_both_phases() {
        let ledger = vec![
            txn("PAIEMENT CAISSE", "-500.00", true),
            txn("STORE A", "100.00", false),
            txn("STORE A", "-100.00", false),
            txn("REFUND X", "-20.00", false),
            txn("GROCERY", "57.63", false),
        ];
        let result = reconcile(ledger, DEFAULT_TOLERANCE);
        assert_eq!(result.payments_removed, 1);
        assert_eq!(result.reimbursements_removed, 3);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].description, "GROCERY");
    }
}
