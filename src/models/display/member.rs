//! Group member display model

use serde::Serialize;
use tabled::Tabled;

use crate::sync::Member;

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MemberDisplay {
    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "UPN / EMAIL")]
    pub email: String,
}

impl From<Member> for MemberDisplay {
    fn from(member: Member) -> Self {
        Self {
            name: member.name,
            email: member.email,
        }
    }
}
