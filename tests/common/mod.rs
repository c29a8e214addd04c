#![allow(dead_code)]

use pedigree_layout::{Gender, Member};

pub fn member(id: &str, parent_id: Option<&str>, children_ids: &[&str]) -> Member {
    Member {
        id: id.to_string(),
        name: None,
        parent_id: parent_id.map(str::to_string),
        spouse_ids: Vec::new(),
        children_ids: children_ids.iter().map(|s| s.to_string()).collect(),
        generation: 0,
        gender: Gender::Unknown,
        birth_date: None,
        death_date: None,
    }
}

pub fn with_gender(mut member: Member, gender: Gender) -> Member {
    member.gender = gender;
    member
}

pub fn with_birth(mut member: Member, date: &str) -> Member {
    member.birth_date = Some(date.to_string());
    member
}

pub fn with_spouses(mut member: Member, spouse_ids: &[&str]) -> Member {
    member.spouse_ids = spouse_ids.iter().map(|s| s.to_string()).collect();
    member
}

/// Three generations: grandparent `g`, their children `f` and `u`, spouse `m`
/// married to `f`, and the grandchildren `c1`/`c2` under `f`.
pub fn sample_family() -> Vec<Member> {
    vec![
        with_birth(
            with_gender(member("g", None, &["f", "u"]), Gender::Male),
            "1940-03-12",
        ),
        with_spouses(
            with_birth(
                with_gender(member("f", Some("g"), &["c1", "c2"]), Gender::Male),
                "1965-06-01",
            ),
            &["m"],
        ),
        with_spouses(
            with_birth(with_gender(member("m", None, &[]), Gender::Female), "1967-09-20"),
            &["f"],
        ),
        with_birth(
            with_gender(member("u", Some("g"), &[]), Gender::Female),
            "1968-01-15",
        ),
        with_birth(
            with_gender(member("c1", Some("f"), &[]), Gender::Male),
            "1990-04-02",
        ),
        with_birth(
            with_gender(member("c2", Some("f"), &[]), Gender::Female),
            "1992-11-30",
        ),
    ]
}
