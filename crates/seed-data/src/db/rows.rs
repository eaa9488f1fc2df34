//! Table mappings for generated rows.

use sqlx::Postgres;
use sqlx::query_builder::Separated;

use super::InsertRow;
use crate::generators::{
    GeneratedActivityLog, GeneratedAuthEvent, GeneratedFileAccess, GeneratedPlan,
    GeneratedSession, GeneratedSharingActivity, GeneratedSystemPerformance, GeneratedTagUsage,
    GeneratedUser, GeneratedUserUsage, GeneratedVersion,
};

type Values<'qb, 'args> = Separated<'qb, 'args, Postgres, &'static str>;

impl InsertRow for GeneratedFileAccess {
    const TABLE: &'static str = "file_access_metrics";
    const COLUMNS: &'static [&'static str] = &[
        "file_id",
        "date",
        "view_count",
        "download_count",
        "last_accessed_by_user",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.file_id)
            .push_bind(self.date)
            .push_bind(self.view_count)
            .push_bind(self.download_count)
            .push_bind(self.last_accessed_by_user);
    }
}

impl InsertRow for GeneratedUserUsage {
    const TABLE: &'static str = "user_usage_metrics";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "date",
        "files_uploaded",
        "files_downloaded",
        "used_storage_mb",
        "active_minutes",
        "login_count",
        "shared_items_count",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.user_id)
            .push_bind(self.date)
            .push_bind(self.files_uploaded)
            .push_bind(self.files_downloaded)
            .push_bind(self.used_storage_mb)
            .push_bind(self.active_minutes)
            .push_bind(self.login_count)
            .push_bind(self.shared_items_count);
    }
}

impl InsertRow for GeneratedSharingActivity {
    const TABLE: &'static str = "sharing_activity_metrics";
    const COLUMNS: &'static [&'static str] = &[
        r#""timestamp""#,
        "user_id",
        "date",
        "links_created",
        "shared_files",
        "revoked_links",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.timestamp)
            .push_bind(self.user_id)
            .push_bind(self.date)
            .push_bind(self.links_created)
            .push_bind(self.shared_files)
            .push_bind(self.revoked_links);
    }
}

impl InsertRow for GeneratedSystemPerformance {
    const TABLE: &'static str = "system_performance_metrics";
    const COLUMNS: &'static [&'static str] = &[
        r#""timestamp""#,
        "cpu_usage_percent",
        "disk_io_mb",
        "avg_response_time_ms",
        "active_sessions",
        "concurrent_uploads",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.timestamp)
            .push_bind(self.cpu_usage_percent)
            .push_bind(self.disk_io_mb)
            .push_bind(self.avg_response_time_ms)
            .push_bind(self.active_sessions)
            .push_bind(self.concurrent_uploads);
    }
}

// Overwrites, never adds: accumulation only happens inside a batch.
impl InsertRow for GeneratedTagUsage {
    const TABLE: &'static str = "tag_usage_metrics";
    const COLUMNS: &'static [&'static str] = &[
        "tag_id",
        "date",
        "assigned_to_files",
        "assigned_to_folders",
        "search_hits",
    ];
    const ON_CONFLICT: Option<&'static str> = Some(
        "ON CONFLICT (tag_id, date) DO UPDATE SET \
         assigned_to_files = EXCLUDED.assigned_to_files, \
         assigned_to_folders = EXCLUDED.assigned_to_folders, \
         search_hits = EXCLUDED.search_hits",
    );

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.tag_id)
            .push_bind(self.date)
            .push_bind(self.assigned_to_files)
            .push_bind(self.assigned_to_folders)
            .push_bind(self.search_hits);
    }
}

impl InsertRow for GeneratedActivityLog {
    const TABLE: &'static str = "activity_log";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "activity_type",
        "resource_id",
        "resource_type",
        "timestamp",
        "ip_address",
        "user_agent",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.user_id)
            .push_bind(self.activity_type)
            .push_bind(self.resource_id)
            .push_bind(self.resource_type)
            .push_bind(self.timestamp)
            .push_bind(self.ip_address)
            .push_bind(self.user_agent.clone());
    }
}

impl InsertRow for GeneratedAuthEvent {
    const TABLE: &'static str = "authentication_log";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "action_type",
        "timestamp",
        "ip_address",
        "user_agent",
        "success",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.user_id)
            .push_bind(self.action_type)
            .push_bind(self.timestamp)
            .push_bind(self.ip_address)
            .push_bind(self.user_agent.clone())
            .push_bind(self.success);
    }
}

impl InsertRow for GeneratedVersion {
    const TABLE: &'static str = "version_history";
    const COLUMNS: &'static [&'static str] = &[
        "file_id",
        "created_by",
        "created_at",
        "version_path",
        "size",
        "checksum",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.file_id)
            .push_bind(self.created_by)
            .push_bind(self.created_at)
            .push_bind(self.version_path.clone())
            .push_bind(self.size)
            .push_bind(self.checksum.clone());
    }
}

impl InsertRow for GeneratedUser {
    const TABLE: &'static str = "usuario";
    const COLUMNS: &'static [&'static str] = &[
        "email",
        "password_hash",
        "full_name",
        "profile_picture",
        "created_at",
        "last_login",
        "email_verified",
        "is_activated",
        "account_type",
        "storage_quota",
        "used_storage",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.email.clone())
            .push_bind(self.password_hash.clone())
            .push_bind(self.full_name.clone())
            .push_bind(self.profile_picture.clone())
            .push_bind(self.created_at)
            .push_bind(self.last_login)
            .push_bind(self.email_verified)
            .push_bind(self.is_activated)
            .push_bind(self.account_type.clone())
            .push_bind(self.storage_quota)
            .push_bind(self.used_storage);
    }
}

impl InsertRow for GeneratedPlan {
    const TABLE: &'static str = "plan_suscripcion";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "name",
        "description",
        "storage_limit",
        "price",
        "is_active",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.user_id)
            .push_bind(self.name)
            .push_bind(self.description)
            .push_bind(self.storage_limit)
            .push_bind(self.price)
            .push_bind(self.is_active);
    }
}

impl InsertRow for GeneratedSession {
    const TABLE: &'static str = "sesion_usuario";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "is_active",
        "device_info",
        "ip_address",
        "created_at",
        "expires_at",
    ];

    fn push_binds<'args>(&self, row: &mut Values<'_, 'args>) {
        row.push_bind(self.user_id)
            .push_bind(self.is_active)
            .push_bind(self.device_info.clone())
            .push_bind(self.ip_address)
            .push_bind(self.created_at)
            .push_bind(self.expires_at);
    }
}
