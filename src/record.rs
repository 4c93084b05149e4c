//! By-name access to fixed-shape records.
//!
//! Wire field names are lowercase-leading (`numOrig`) while record attributes
//! are capitalized (`NumOrig`). Each record shape publishes a static table of
//! accessors keyed by the capitalized name, and [`set_by_name`] /
//! [`get_by_name`] translate between the two vocabularies. A name that is not
//! in the table is an error for that one field only.

use crate::error::FieldError;

/// How an attribute can be reached.
pub enum Access<R: 'static> {
    /// Readable and writable text attribute
    Text {
        get: fn(&R) -> &str,
        set: fn(&mut R, String),
    },
    /// Text attribute that can be read but not assigned
    ReadOnly { get: fn(&R) -> &str },
    /// Attribute that does not hold text
    Opaque,
}

/// One entry of a record's accessor table.
pub struct FieldSpec<R: 'static> {
    pub name: &'static str,
    pub access: Access<R>,
}

/// A record shape with a static accessor table.
pub trait Record: Sized + 'static {
    fn fields() -> &'static [FieldSpec<Self>];
}

/// Assign `value` to the attribute matching `field_name`.
pub fn set_by_name<R: Record>(
    record: &mut R,
    field_name: &str,
    value: &str,
) -> Result<(), FieldError> {
    let name = attribute_name(field_name);
    match &lookup::<R>(&name)?.access {
        Access::Text { set, .. } => {
            set(record, value.to_string());
            Ok(())
        }
        Access::ReadOnly { .. } => Err(FieldError::NotSettable(name)),
        Access::Opaque => Err(FieldError::WrongType(name)),
    }
}

/// Read the attribute matching `field_name`.
pub fn get_by_name<R: Record>(record: &R, field_name: &str) -> Result<String, FieldError> {
    let name = attribute_name(field_name);
    match &lookup::<R>(&name)?.access {
        Access::Text { get, .. } | Access::ReadOnly { get } => Ok(get(record).to_string()),
        Access::Opaque => Err(FieldError::WrongType(name)),
    }
}

fn lookup<R: Record>(name: &str) -> Result<&'static FieldSpec<R>, FieldError> {
    R::fields()
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| FieldError::NotFound(name.to_string()))
}

/// Upper-case the first character of a wire field name.
fn attribute_name(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds a table of read/write text accessors for plain `String` members.
macro_rules! text_fields {
    ($record:ty { $($name:literal => $member:ident),* $(,)? }) => {
        &[$(
            FieldSpec::<$record> {
                name: $name,
                access: Access::Text {
                    get: |r| r.$member.as_str(),
                    set: |r, value| r.$member = value,
                },
            }
        ),*]
    };
}

/// Resource usage of one trunk, as reported by `XBResourceRealTimeStatList`.
///
/// Counters stay as text until they are projected into gauges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrunkRecord {
    pub trunk_id: String,
    pub alias: String,
    pub fqdn: String,
    pub num_orig: String,
    pub num_term: String,
    pub cps: String,
    pub num_peak: String,
    pub total_clz: String,
    pub num_clz_cps: String,
    pub total_limit: String,
    pub cps_limit: String,
}

/// `Fqdn` value marking the aggregate row of a trunk group.
pub const GROUP_FQDN: &str = "Group";

/// Counters exported for every trunk group, by attribute name.
pub const TRUNK_COUNTERS: [&str; 8] = [
    "NumOrig",
    "NumTerm",
    "Cps",
    "NumPeak",
    "TotalCLZ",
    "NumCLZCps",
    "TotalLimit",
    "CpsLimit",
];

static TRUNK_FIELDS: &[FieldSpec<TrunkRecord>] = text_fields!(TrunkRecord {
    "TrunkId" => trunk_id,
    "Alias" => alias,
    "Fqdn" => fqdn,
    "NumOrig" => num_orig,
    "NumTerm" => num_term,
    "Cps" => cps,
    "NumPeak" => num_peak,
    "TotalCLZ" => total_clz,
    "NumCLZCps" => num_clz_cps,
    "TotalLimit" => total_limit,
    "CpsLimit" => cps_limit,
});

impl Record for TrunkRecord {
    fn fields() -> &'static [FieldSpec<Self>] {
        TRUNK_FIELDS
    }
}

impl TrunkRecord {
    /// Whether this row is a group aggregate rather than a member detail.
    pub fn is_group(&self) -> bool {
        self.fqdn == GROUP_FQDN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_round_trip() {
        let mut trunk = TrunkRecord::default();
        set_by_name(&mut trunk, "numOrig", "42").unwrap();
        assert_eq!(get_by_name(&trunk, "numOrig").unwrap(), "42");
        assert_eq!(trunk.num_orig, "42");
    }

    #[test]
    fn test_capitalized_names_resolve_too() {
        let mut trunk = TrunkRecord::default();
        set_by_name(&mut trunk, "TotalCLZ", "7").unwrap();
        set_by_name(&mut trunk, "numCLZCps", "3").unwrap();
        assert_eq!(trunk.total_clz, "7");
        assert_eq!(get_by_name(&trunk, "NumCLZCps").unwrap(), "3");
    }

    #[test]
    fn test_names_are_case_sensitive_after_first_char() {
        let mut trunk = TrunkRecord::default();
        assert_eq!(
            set_by_name(&mut trunk, "totalclz", "1"),
            Err(FieldError::NotFound("Totalclz".to_string()))
        );
    }

    #[test]
    fn test_unknown_field() {
        let mut trunk = TrunkRecord::default();
        assert_eq!(
            set_by_name(&mut trunk, "bogus", "1"),
            Err(FieldError::NotFound("Bogus".to_string()))
        );
        assert_eq!(
            get_by_name(&trunk, "bogus"),
            Err(FieldError::NotFound("Bogus".to_string()))
        );
        assert_eq!(trunk, TrunkRecord::default());
    }

    #[test]
    fn test_empty_name_is_not_found() {
        let mut trunk = TrunkRecord::default();
        assert_eq!(
            set_by_name(&mut trunk, "", "1"),
            Err(FieldError::NotFound(String::new()))
        );
    }

    #[test]
    fn test_group_detection() {
        let mut trunk = TrunkRecord::default();
        set_by_name(&mut trunk, "fqdn", "10.0.0.1").unwrap();
        assert!(!trunk.is_group());
        set_by_name(&mut trunk, "fqdn", "Group").unwrap();
        assert!(trunk.is_group());
    }

    #[test]
    fn test_every_counter_is_in_the_table() {
        let trunk = TrunkRecord::default();
        for counter in TRUNK_COUNTERS {
            assert_eq!(get_by_name(&trunk, counter).unwrap(), "");
        }
    }

    struct Meter {
        id: String,
    }

    static METER_FIELDS: &[FieldSpec<Meter>] = &[
        FieldSpec {
            name: "Id",
            access: Access::ReadOnly { get: |p| p.id.as_str() },
        },
        FieldSpec {
            name: "Weight",
            access: Access::Opaque,
        },
    ];

    impl Record for Meter {
        fn fields() -> &'static [FieldSpec<Self>] {
            METER_FIELDS
        }
    }

    #[test]
    fn test_read_only_attribute() {
        let mut meter = Meter { id: "p1".into() };
        assert_eq!(
            set_by_name(&mut meter, "id", "p2"),
            Err(FieldError::NotSettable("Id".to_string()))
        );
        assert_eq!(get_by_name(&meter, "id").unwrap(), "p1");
    }

    #[test]
    fn test_non_text_attribute() {
        let mut meter = Meter { id: "p1".into() };
        assert_eq!(
            set_by_name(&mut meter, "weight", "1"),
            Err(FieldError::WrongType("Weight".to_string()))
        );
        assert_eq!(
            get_by_name(&meter, "weight"),
            Err(FieldError::WrongType("Weight".to_string()))
        );
    }
}
