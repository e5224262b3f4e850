use serde::{Deserialize, Serialize};

use super::domain::{BloodGroup, DonorRecord, DonorTable};

/// Patient-side request for compatible donors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub blood_group: BloodGroup,
    pub city: String,
}

impl MatchQuery {
    /// Exact blood group, eligible donor, and city equal after lowercasing (no trimming).
    pub fn matches(&self, record: &DonorRecord) -> bool {
        record.blood_group == self.blood_group
            && record.eligible.is_eligible()
            && record.city.to_lowercase() == self.city.to_lowercase()
    }
}

/// Stable filter of `table` down to the donors satisfying the query.
pub fn match_donors(table: &DonorTable, blood_group: BloodGroup, city: &str) -> DonorTable {
    let query = MatchQuery {
        blood_group,
        city: city.to_string(),
    };
    table
        .iter()
        .filter(|record| query.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::donors::domain::{Eligibility, Gender};

    fn donor(id: u64, group: BloodGroup, city: &str, eligible: Eligibility) -> DonorRecord {
        DonorRecord {
            donor_id: id,
            age: 30,
            gender: Gender::Female,
            blood_group: group,
            city: city.to_string(),
            eligible,
        }
    }

    #[test]
    fn city_comparison_ignores_case_but_not_whitespace() {
        let table = DonorTable::from(vec![
            donor(1, BloodGroup::OPositive, "chennai", Eligibility::Yes),
            donor(2, BloodGroup::OPositive, "Chennai ", Eligibility::Yes),
            donor(3, BloodGroup::OPositive, "CHENNAI", Eligibility::Yes),
        ]);

        let matches = match_donors(&table, BloodGroup::OPositive, "Chennai");
        let ids: Vec<u64> = matches.iter().map(|record| record.donor_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn blood_group_and_eligibility_must_match_exactly() {
        let table = DonorTable::from(vec![
            donor(1, BloodGroup::ONegative, "Pune", Eligibility::Yes),
            donor(2, BloodGroup::OPositive, "Pune", Eligibility::No),
            donor(3, BloodGroup::OPositive, "Pune", Eligibility::Yes),
        ]);

        let matches = match_donors(&table, BloodGroup::OPositive, "pune");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.records()[0].donor_id, 3);
    }

    #[test]
    fn preserves_table_order_and_duplicate_ids() {
        let table = DonorTable::from(vec![
            donor(7, BloodGroup::BPositive, "Delhi", Eligibility::Yes),
            donor(2, BloodGroup::BPositive, "Mumbai", Eligibility::Yes),
            donor(7, BloodGroup::BPositive, "delhi", Eligibility::Yes),
            donor(4, BloodGroup::BPositive, "DELHI", Eligibility::Yes),
        ]);

        let matches = match_donors(&table, BloodGroup::BPositive, "Delhi");
        let ids: Vec<u64> = matches.iter().map(|record| record.donor_id).collect();
        assert_eq!(ids, vec![7, 7, 4]);
    }

    #[test]
    fn empty_table_yields_empty_result() {
        let matches = match_donors(&DonorTable::new(), BloodGroup::AbNegative, "Pune");
        assert!(matches.is_empty());
    }

    #[test]
    fn lowercasing_handles_non_ascii_city_names() {
        let table = DonorTable::from(vec![donor(
            1,
            BloodGroup::APositive,
            "ÉVORA",
            Eligibility::Yes,
        )]);
        assert_eq!(match_donors(&table, BloodGroup::APositive, "évora").len(), 1);
    }
}
