use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_salons_table::Migration),
            Box::new(m20240101_000002_create_users_table::Migration),
            Box::new(m20240101_000003_create_appointments_table::Migration),
            Box::new(m20240101_000004_create_catalog_tables::Migration),
            Box::new(m20240101_000005_create_inventory_table::Migration),
            Box::new(m20240101_000006_create_payment_methods_table::Migration),
            Box::new(m20240101_000007_create_messages_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_salons_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_salons_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Salons::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Salons::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Salons::Name).string().not_null())
                        .col(
                            ColumnDef::new(Salons::Slug)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Salons::About).string().null())
                        .col(ColumnDef::new(Salons::Phone).string().null())
                        .col(ColumnDef::new(Salons::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Salons::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Salons {
        Table,
        Id,
        Name,
        Slug,
        About,
        Phone,
        CreatedAt,
    }
}

mod m20240101_000002_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::SalonId).uuid().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        Name,
        SalonId,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_appointments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_appointments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Appointments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Appointments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Appointments::SalonId).uuid().not_null())
                        .col(ColumnDef::new(Appointments::ClientName).string().not_null())
                        .col(
                            ColumnDef::new(Appointments::ClientEmail)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Appointments::ServiceName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Appointments::StaffId).uuid().null())
                        .col(
                            ColumnDef::new(Appointments::ScheduledDate)
                                .date()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Appointments::StartTime).time().not_null())
                        .col(ColumnDef::new(Appointments::Status).string().not_null())
                        .col(
                            ColumnDef::new(Appointments::TotalPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Appointments::Notes).string().null())
                        .col(
                            ColumnDef::new(Appointments::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Appointments::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // Listing and analytics queries always filter on the owning salon
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_appointments_salon_id")
                        .table(Appointments::Table)
                        .col(Appointments::SalonId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_appointments_salon_date")
                        .table(Appointments::Table)
                        .col(Appointments::SalonId)
                        .col(Appointments::ScheduledDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Appointments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Appointments {
        Table,
        Id,
        SalonId,
        ClientName,
        ClientEmail,
        ServiceName,
        StaffId,
        ScheduledDate,
        StartTime,
        Status,
        TotalPrice,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Services::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Services::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Services::SalonId).uuid().not_null())
                        .col(ColumnDef::new(Services::Name).string().not_null())
                        .col(ColumnDef::new(Services::Description).string().null())
                        .col(
                            ColumnDef::new(Services::DurationMinutes)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Services::Price)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Services::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Services::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_services_salon_id")
                        .table(Services::Table)
                        .col(Services::SalonId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Staff::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Staff::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Staff::SalonId).uuid().not_null())
                        .col(ColumnDef::new(Staff::Name).string().not_null())
                        .col(ColumnDef::new(Staff::Role).string().not_null())
                        .col(
                            ColumnDef::new(Staff::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Staff::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_staff_salon_id")
                        .table(Staff::Table)
                        .col(Staff::SalonId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Staff::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Services::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Services {
        Table,
        Id,
        SalonId,
        Name,
        Description,
        DurationMinutes,
        Price,
        Active,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Staff {
        Table,
        Id,
        SalonId,
        Name,
        Role,
        Active,
        CreatedAt,
    }
}

mod m20240101_000005_create_inventory_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_inventory_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::SalonId).uuid().not_null())
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(InventoryItems::UnitCost).decimal().null())
                        .col(
                            ColumnDef::new(InventoryItems::LowStockThreshold)
                                .integer()
                                .not_null()
                                .default(5),
                        )
                        .col(ColumnDef::new(InventoryItems::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_salon_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::SalonId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum InventoryItems {
        Table,
        Id,
        SalonId,
        Name,
        Quantity,
        UnitCost,
        LowStockThreshold,
        UpdatedAt,
    }
}

mod m20240101_000006_create_payment_methods_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_payment_methods_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PaymentMethods::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentMethods::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PaymentMethods::SalonId).uuid().not_null())
                        .col(ColumnDef::new(PaymentMethods::Label).string().not_null())
                        .col(ColumnDef::new(PaymentMethods::Kind).string().not_null())
                        .col(
                            ColumnDef::new(PaymentMethods::Enabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payment_methods_salon_id")
                        .table(PaymentMethods::Table)
                        .col(PaymentMethods::SalonId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PaymentMethods {
        Table,
        Id,
        SalonId,
        Label,
        Kind,
        Enabled,
    }
}

mod m20240101_000007_create_messages_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_messages_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Messages::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Messages::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Messages::SalonId).uuid().not_null())
                        .col(ColumnDef::new(Messages::ClientName).string().not_null())
                        .col(ColumnDef::new(Messages::ClientEmail).string().not_null())
                        .col(ColumnDef::new(Messages::Body).string().not_null())
                        .col(
                            ColumnDef::new(Messages::IsRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Messages::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_messages_salon_id")
                        .table(Messages::Table)
                        .col(Messages::SalonId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Messages::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Messages {
        Table,
        Id,
        SalonId,
        ClientName,
        ClientEmail,
        Body,
        IsRead,
        CreatedAt,
    }
}
