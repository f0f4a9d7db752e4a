use crate::target::{Quotas, Target};

/// Turn percentage shares into row quotas for `total_records` rows.
///
/// Every target gets `floor(total * percent / 100)` rows. Whatever flooring
/// leaves over goes to the first target holding the smallest share.
pub fn balance(total_records: u64, targets: &[Target]) -> Quotas {
    let mut quotas = Vec::with_capacity(targets.len());
    let mut assigned_total: u64 = 0;
    let mut smallest: Option<usize> = None;

    for (idx, target) in targets.iter().enumerate() {
        let assigned = (u128::from(total_records) * u128::from(target.percent) / 100) as u64;
        quotas.push(assigned);
        assigned_total = assigned_total.saturating_add(assigned);

        // strictly smaller only: ties keep the earlier target
        match smallest {
            Some(s) if targets[s].percent <= target.percent => {}
            _ => smallest = Some(idx),
        }
    }

    let remainder = total_records.saturating_sub(assigned_total);
    if remainder > 0 {
        if let Some(s) = smallest {
            quotas[s] += remainder;
        }
    }

    Quotas::from_vec(quotas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(shares: &[u8]) -> Vec<Target> {
        shares
            .iter()
            .enumerate()
            .map(|(i, &p)| Target::new(p, format!("out_{i}.csv")))
            .collect()
    }

    #[test]
    fn exact_split() {
        let q = balance(10, &targets(&[70, 30]));
        assert_eq!(q.as_slice(), &[7, 3]);
    }

    #[test]
    fn remainder_goes_to_first_smallest() {
        let q = balance(10, &targets(&[33, 33, 34]));
        assert_eq!(q.as_slice(), &[4, 3, 3]);
    }

    #[test]
    fn remainder_skips_larger_earlier_targets() {
        // 80/10/10 of 7 -> 5,0,0 floored, remainder 2 to the first 10%
        let q = balance(7, &targets(&[80, 10, 10]));
        assert_eq!(q.as_slice(), &[5, 2, 0]);
    }

    #[test]
    fn zero_records() {
        let q = balance(0, &targets(&[50, 25, 25]));
        assert_eq!(q.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn zero_share_target_absorbs_remainder() {
        let q = balance(3, &targets(&[50, 50, 0]));
        assert_eq!(q.as_slice(), &[1, 1, 1]);
    }

    #[test]
    fn large_totals_do_not_overflow() {
        let total = u64::MAX / 2;
        let q = balance(total, &targets(&[99, 1]));
        assert_eq!(q.total(), total);
    }

    #[test]
    fn empty_targets() {
        assert!(balance(10, &[]).is_empty());
    }
}
