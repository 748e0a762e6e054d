//! Property-based tests for LedgerService.
//!
//! Applying every plan produced for an arbitrary sequence of transaction
//! creates, updates and deletes keeps each account balance equal to the sum
//! of the amounts of the transactions currently linked to it.

use std::collections::HashMap;

use fintrack_shared::types::{AccountId, Amount};
use proptest::prelude::*;

use super::service::LedgerService;
use super::types::{BalancePlan, Posting};

const ACCOUNTS: i32 = 3;

#[derive(Debug, Clone)]
enum Op {
    Create(Posting),
    Update(usize, Posting),
    Delete(usize),
}

/// Amounts between -10,000.00 and 10,000.00, zero included.
fn amount() -> impl Strategy<Value = Amount> {
    (-1_000_000i64..=1_000_000i64).prop_map(Amount::from_cents)
}

fn account() -> impl Strategy<Value = Option<AccountId>> {
    prop_oneof![
        1 => Just(None),
        3 => (1..=ACCOUNTS).prop_map(|id| Some(AccountId::new(id))),
    ]
}

fn posting() -> impl Strategy<Value = Posting> {
    (account(), amount()).prop_map(|(account_id, amount)| Posting::new(account_id, amount))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => posting().prop_map(Op::Create),
        2 => (any::<usize>(), posting()).prop_map(|(i, p)| Op::Update(i, p)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn apply(balances: &mut HashMap<AccountId, Amount>, plan: &BalancePlan) {
    for adjustment in plan.adjustments() {
        let balance = balances.entry(adjustment.account_id).or_insert(Amount::ZERO);
        *balance = balance.checked_add(adjustment.delta).unwrap();
    }
}

fn expected(transactions: &[Posting], account_id: AccountId) -> Amount {
    transactions
        .iter()
        .filter(|p| p.account_id == Some(account_id))
        .try_fold(Amount::ZERO, |acc, p| acc.checked_add(p.amount))
        .unwrap()
}

proptest! {
    #[test]
    fn prop_balance_equals_sum_of_linked_transactions(ops in prop::collection::vec(op(), 1..60)) {
        let mut balances: HashMap<AccountId, Amount> = HashMap::new();
        let mut transactions: Vec<Posting> = Vec::new();

        for op in ops {
            match op {
                Op::Create(new) => {
                    apply(&mut balances, &LedgerService::plan_create(&new));
                    transactions.push(new);
                }
                Op::Update(i, new) if !transactions.is_empty() => {
                    let i = i % transactions.len();
                    apply(&mut balances, &LedgerService::plan_update(&transactions[i], &new).unwrap());
                    transactions[i] = new;
                }
                Op::Delete(i) if !transactions.is_empty() => {
                    let i = i % transactions.len();
                    let old = transactions.remove(i);
                    apply(&mut balances, &LedgerService::plan_delete(&old).unwrap());
                }
                Op::Update(..) | Op::Delete(_) => {}
            }

            for id in 1..=ACCOUNTS {
                let account_id = AccountId::new(id);
                let balance = balances.get(&account_id).copied().unwrap_or(Amount::ZERO);
                prop_assert_eq!(balance, expected(&transactions, account_id));
            }
        }
    }

    #[test]
    fn prop_plans_never_contain_zero_deltas(old in posting(), new in posting()) {
        let plans = [
            LedgerService::plan_create(&new),
            LedgerService::plan_update(&old, &new).unwrap(),
            LedgerService::plan_delete(&old).unwrap(),
        ];
        for plan in &plans {
            prop_assert!(plan.adjustments().iter().all(|a| !a.delta.is_zero()));
        }
    }

    #[test]
    fn prop_update_nets_to_amount_difference(account in 1..=ACCOUNTS, old in amount(), new in amount()) {
        let account_id = Some(AccountId::new(account));
        let plan = LedgerService::plan_update(
            &Posting::new(account_id, old),
            &Posting::new(account_id, new),
        )
        .unwrap();
        let net = plan
            .adjustments()
            .iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a.delta))
            .unwrap();
        prop_assert_eq!(Some(net), new.checked_sub(old));
    }
}
