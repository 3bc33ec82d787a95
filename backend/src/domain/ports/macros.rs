//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant gets a snake_case constructor whose fields accept anything
//! convertible into the declared type, plus a stable `kind()` label used in
//! structured logs. Unit variants get a zero-argument constructor.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum PageRepositoryError {
//!         Missing { id: String } => "page {id} does not exist",
//!     }
//! }
//! let err = PageRepositoryError::missing("p1");
//! assert_eq!(err.kind(), "missing");
//! ```

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*

                /// Snake-case variant name for log fields.
                pub fn kind(&self) -> &'static str {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum DocumentStoreError {
            Offline { message: String } => "document store offline: {message}",
            Missing { id: String } => "document {id} does not exist",
            Revision { expected: u32 } => "revision {expected} is stale",
            DuplicateSlug { slug: String, owner: u32 } => "{slug} already used by {owner}",
            ReadOnly => "document store is read-only",
        }
    }

    #[rstest]
    #[case(DocumentStoreError::offline("timeout"), "offline", "document store offline: timeout")]
    #[case(DocumentStoreError::missing("a1"), "missing", "document a1 does not exist")]
    #[case(DocumentStoreError::revision(3_u32), "revision", "revision 3 is stale")]
    #[case(
        DocumentStoreError::duplicate_slug("hello", 7_u32),
        "duplicate_slug",
        "hello already used by 7"
    )]
    #[case(DocumentStoreError::read_only(), "read_only", "document store is read-only")]
    fn constructors_build_the_matching_variant(
        #[case] error: DocumentStoreError,
        #[case] kind: &str,
        #[case] message: &str,
    ) {
        assert_eq!(error.kind(), kind);
        assert_eq!(error.to_string(), message);
    }

    #[rstest]
    fn string_fields_accept_borrowed_text() {
        assert_eq!(
            DocumentStoreError::missing("a1"),
            DocumentStoreError::Missing { id: "a1".to_owned() }
        );
    }
}
