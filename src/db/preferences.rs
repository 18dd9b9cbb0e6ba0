use anyhow::{Context, Result};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::MembershipTier;

/// Preference key holding the last chosen membership level.
const MEMBERSHIP_KEY: &str = "membership_level";

/// Read the persisted membership level. Missing or unrecognized values come
/// back as [`MembershipTier::None`].
pub fn load_membership_level(conn: &Connection) -> Result<MembershipTier> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![MEMBERSHIP_KEY],
            |row| row.get(0),
        )
        .optional()
        .context("failed to read membership preference")?;

    Ok(MembershipTier::from_optional(raw.as_deref()))
}

/// Pick the tier a session starts with. An explicit `flag` wins over the
/// stored preference, even when it does not name a known tier; neither
/// present means non-member.
pub fn resolve_membership(conn: &Connection, flag: Option<&str>) -> Result<MembershipTier> {
    match flag {
        Some(raw) => {
            let tier = MembershipTier::from_raw(raw);
            info!("membership {tier} from command line (raw {raw:?})");
            Ok(tier)
        }
        None => {
            let tier = load_membership_level(conn)?;
            info!("membership {tier} from stored preference");
            Ok(tier)
        }
    }
}

/// Persist the membership level so the next session starts with it.
pub fn store_membership_level(conn: &Connection, tier: MembershipTier) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![MEMBERSHIP_KEY, tier.key()],
    )
    .context("failed to store membership preference")?;
    info!("membership level set to {tier}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(conn)
    }

    #[test]
    fn missing_preference_is_non_member() -> Result<()> {
        let conn = memory()?;
        assert_eq!(load_membership_level(&conn)?, MembershipTier::None);
        Ok(())
    }

    #[test]
    fn preference_round_trips_and_overwrites() -> Result<()> {
        let conn = memory()?;
        store_membership_level(&conn, MembershipTier::Premium)?;
        assert_eq!(load_membership_level(&conn)?, MembershipTier::Premium);
        store_membership_level(&conn, MembershipTier::Base)?;
        assert_eq!(load_membership_level(&conn)?, MembershipTier::Base);
        Ok(())
    }

    #[test]
    fn garbage_in_the_store_reads_as_non_member() -> Result<()> {
        let conn = memory()?;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, 'gold')",
            params![MEMBERSHIP_KEY],
        )?;
        assert_eq!(load_membership_level(&conn)?, MembershipTier::None);
        Ok(())
    }

    #[test]
    fn flag_wins_over_stored_level() -> Result<()> {
        let conn = memory()?;
        store_membership_level(&conn, MembershipTier::Base)?;
        assert_eq!(
            resolve_membership(&conn, Some("Unlimited"))?,
            MembershipTier::Unlimited
        );
        Ok(())
    }

    #[test]
    fn stored_level_used_without_flag() -> Result<()> {
        let conn = memory()?;
        store_membership_level(&conn, MembershipTier::Premium)?;
        assert_eq!(resolve_membership(&conn, None)?, MembershipTier::Premium);
        Ok(())
    }

    #[test]
    fn nothing_stored_and_no_flag_is_non_member() -> Result<()> {
        let conn = memory()?;
        assert_eq!(resolve_membership(&conn, None)?, MembershipTier::None);
        Ok(())
    }

    #[test]
    fn unknown_flag_does_not_fall_back_to_stored_level() -> Result<()> {
        let conn = memory()?;
        store_membership_level(&conn, MembershipTier::Premium)?;
        assert_eq!(resolve_membership(&conn, Some("gold"))?, MembershipTier::None);
        Ok(())
    }
}
