use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_sales_orders_table::Migration),
            Box::new(m20240101_000002_create_sales_order_lines_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_sales_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_sales_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SalesOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesOrders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SalesOrders::ReferenceNumber).big_integer())
                        .col(ColumnDef::new(SalesOrders::CustomerCode).string().not_null())
                        .col(ColumnDef::new(SalesOrders::UserId).big_integer().not_null())
                        .col(ColumnDef::new(SalesOrders::Status).string())
                        .col(ColumnDef::new(SalesOrders::Remarks).text())
                        .col(
                            ColumnDef::new(SalesOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SalesOrders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum SalesOrders {
        Table,
        Id,
        ReferenceNumber,
        CustomerCode,
        UserId,
        Status,
        Remarks,
        CreatedAt,
    }
}

mod m20240101_000002_create_sales_order_lines_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_sales_orders_table::SalesOrders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_sales_order_lines_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SalesOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesOrderLines::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(SalesOrderLines::OrderId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesOrderLines::ReferenceNumber).big_integer())
                        .col(
                            ColumnDef::new(SalesOrderLines::ItemCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesOrderLines::ItemName).string())
                        .col(ColumnDef::new(SalesOrderLines::PolicyCode).string())
                        .col(ColumnDef::new(SalesOrderLines::PolicyDetail).string())
                        .col(
                            ColumnDef::new(SalesOrderLines::RequestedQty)
                                .decimal_len(20, 6)
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesOrderLines::PolicyRate).decimal_len(20, 6))
                        .col(
                            ColumnDef::new(SalesOrderLines::RequestedRate)
                                .decimal_len(20, 6)
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesOrderLines::ApprovedQty).decimal_len(20, 6))
                        .col(ColumnDef::new(SalesOrderLines::ApprovedRate).decimal_len(20, 6))
                        .col(
                            ColumnDef::new(SalesOrderLines::RequestedValue)
                                .decimal_len(20, 6)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesOrderLines::ApprovedValue)
                                .decimal_len(20, 6)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sales_order_lines_order_id")
                                .from(SalesOrderLines::Table, SalesOrderLines::OrderId)
                                .to(SalesOrders::Table, SalesOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_sales_order_lines_order_id")
                        .table(SalesOrderLines::Table)
                        .col(SalesOrderLines::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SalesOrderLines::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum SalesOrderLines {
        Table,
        Id,
        OrderId,
        ReferenceNumber,
        ItemCode,
        ItemName,
        PolicyCode,
        PolicyDetail,
        RequestedQty,
        PolicyRate,
        RequestedRate,
        ApprovedQty,
        ApprovedRate,
        RequestedValue,
        ApprovedValue,
    }
}
