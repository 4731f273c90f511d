use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create banks table
        manager
            .create_table(
                Table::create()
                    .table(Banks::Table)
                    .if_not_exists()
                    .col(pk_auto(Banks::Id))
                    .col(string(Banks::Name).unique_key())
                    .col(integer(Banks::NumOffices).default(0).check(Expr::col(Banks::NumOffices).gte(0)))
                    .col(integer(Banks::NumAtms).default(0).check(Expr::col(Banks::NumAtms).gte(0)))
                    .col(integer(Banks::NumEmployees).default(0).check(Expr::col(Banks::NumEmployees).gte(0)))
                    .col(integer(Banks::NumClients).default(0).check(Expr::col(Banks::NumClients).gte(0)))
                    .col(integer(Banks::Rating).check(Expr::col(Banks::Rating).between(0, 100)))
                    .col(big_integer(Banks::TotalMoney).check(Expr::col(Banks::TotalMoney).between(0, 1_000_000)))
                    .col(
                        decimal(Banks::InterestRate)
                            .decimal_len(5, 2)
                            .check(Expr::col(Banks::InterestRate).between(0, 20)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create bank_offices table
        manager
            .create_table(
                Table::create()
                    .table(BankOffices::Table)
                    .if_not_exists()
                    .col(pk_auto(BankOffices::Id))
                    .col(string(BankOffices::Name))
                    .col(string(BankOffices::Address))
                    .col(string_len(BankOffices::Status, 50))
                    .col(boolean(BankOffices::CanPlaceAtm))
                    .col(integer(BankOffices::NumAtms).default(0).check(Expr::col(BankOffices::NumAtms).gte(0)))
                    .col(boolean(BankOffices::CanProvideCredit))
                    .col(boolean(BankOffices::DispenseMoney))
                    .col(boolean(BankOffices::AcceptMoney))
                    .col(big_integer(BankOffices::MoneyInOffice).default(0))
                    .col(decimal(BankOffices::RentCost).decimal_len(12, 2))
                    .col(integer(BankOffices::BankId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_offices_bank")
                            .from(BankOffices::Table, BankOffices::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create employees table
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(string(Employees::FullName))
                    .col(date(Employees::BirthDate))
                    .col(string(Employees::Position))
                    .col(integer(Employees::BankId))
                    .col(boolean(Employees::WorksRemotely))
                    .col(integer_null(Employees::BankOfficeId))
                    .col(boolean(Employees::CanProvideCredit))
                    .col(decimal(Employees::Salary).decimal_len(9, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_bank")
                            .from(Employees::Table, Employees::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_bank_office")
                            .from(Employees::Table, Employees::BankOfficeId)
                            .to(BankOffices::Table, BankOffices::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create atms table
        manager
            .create_table(
                Table::create()
                    .table(Atms::Table)
                    .if_not_exists()
                    .col(pk_auto(Atms::Id))
                    .col(string(Atms::Name))
                    .col(string(Atms::Address))
                    .col(string_len(Atms::Status, 50))
                    .col(integer(Atms::BankId))
                    .col(integer(Atms::BankOfficeId))
                    .col(integer_null(Atms::EmployeeId))
                    .col(boolean(Atms::DispenseMoney))
                    .col(boolean(Atms::AcceptMoney))
                    .col(big_integer(Atms::MoneyInAtm).default(0))
                    .col(decimal(Atms::MaintenanceCost).decimal_len(12, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_atms_bank")
                            .from(Atms::Table, Atms::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_atms_bank_office")
                            .from(Atms::Table, Atms::BankOfficeId)
                            .to(BankOffices::Table, BankOffices::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_atms_employee")
                            .from(Atms::Table, Atms::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::FullName))
                    .col(date(Users::BirthDate))
                    .col(string_null(Users::Job))
                    .col(
                        decimal(Users::MonthlyIncome)
                            .decimal_len(10, 2)
                            .check(Expr::col(Users::MonthlyIncome).lte(10_000)),
                    )
                    .col(integer(Users::CreditRating).check(Expr::col(Users::CreditRating).between(100, 1000)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_users_full_name_birth_date")
                    .table(Users::Table)
                    .col(Users::FullName)
                    .col(Users::BirthDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create user_banks table (join table)
        manager
            .create_table(
                Table::create()
                    .table(UserBanks::Table)
                    .if_not_exists()
                    .col(integer(UserBanks::UserId))
                    .col(integer(UserBanks::BankId))
                    .primary_key(
                        Index::create()
                            .name("pk_user_banks")
                            .col(UserBanks::UserId)
                            .col(UserBanks::BankId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_banks_user")
                            .from(UserBanks::Table, UserBanks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_banks_bank")
                            .from(UserBanks::Table, UserBanks::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create payment_accounts table
        manager
            .create_table(
                Table::create()
                    .table(PaymentAccounts::Table)
                    .if_not_exists()
                    .col(pk_auto(PaymentAccounts::Id))
                    .col(integer(PaymentAccounts::UserId))
                    .col(string(PaymentAccounts::BankName))
                    .col(
                        decimal(PaymentAccounts::Balance)
                            .decimal_len(12, 2)
                            .default(0)
                            .check(Expr::col(PaymentAccounts::Balance).gte(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_accounts_user")
                            .from(PaymentAccounts::Table, PaymentAccounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create credit_accounts table
        manager
            .create_table(
                Table::create()
                    .table(CreditAccounts::Table)
                    .if_not_exists()
                    .col(pk_auto(CreditAccounts::Id))
                    .col(integer(CreditAccounts::UserId))
                    .col(string(CreditAccounts::BankName))
                    .col(date(CreditAccounts::StartDate))
                    .col(date_null(CreditAccounts::EndDate))
                    .col(integer(CreditAccounts::LoanDurationMonths))
                    .col(decimal(CreditAccounts::LoanAmount).decimal_len(14, 2))
                    .col(decimal(CreditAccounts::MonthlyPayment).decimal_len(14, 2))
                    .col(decimal(CreditAccounts::InterestRate).decimal_len(5, 2))
                    .col(integer(CreditAccounts::EmployeeId))
                    .col(integer(CreditAccounts::PaymentAccountId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_accounts_user")
                            .from(CreditAccounts::Table, CreditAccounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_accounts_employee")
                            .from(CreditAccounts::Table, CreditAccounts::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_accounts_payment_account")
                            .from(CreditAccounts::Table, CreditAccounts::PaymentAccountId)
                            .to(PaymentAccounts::Table, PaymentAccounts::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to respect foreign key constraints
        manager
            .drop_table(Table::drop().table(CreditAccounts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentAccounts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBanks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Atms::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankOffices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Banks::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Banks {
    Table,
    Id,
    Name,
    NumOffices,
    NumAtms,
    NumEmployees,
    NumClients,
    Rating,
    TotalMoney,
    InterestRate,
}

#[derive(DeriveIden)]
enum BankOffices {
    Table,
    Id,
    Name,
    Address,
    Status,
    CanPlaceAtm,
    NumAtms,
    CanProvideCredit,
    DispenseMoney,
    AcceptMoney,
    MoneyInOffice,
    RentCost,
    BankId,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FullName,
    BirthDate,
    Position,
    BankId,
    WorksRemotely,
    BankOfficeId,
    CanProvideCredit,
    Salary,
}

#[derive(DeriveIden)]
enum Atms {
    Table,
    Id,
    Name,
    Address,
    Status,
    BankId,
    BankOfficeId,
    EmployeeId,
    DispenseMoney,
    AcceptMoney,
    MoneyInAtm,
    MaintenanceCost,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FullName,
    BirthDate,
    Job,
    MonthlyIncome,
    CreditRating,
}

#[derive(DeriveIden)]
enum UserBanks {
    Table,
    UserId,
    BankId,
}

#[derive(DeriveIden)]
enum PaymentAccounts {
    Table,
    Id,
    UserId,
    BankName,
    Balance,
}

#[derive(DeriveIden)]
enum CreditAccounts {
    Table,
    Id,
    UserId,
    BankName,
    StartDate,
    EndDate,
    LoanDurationMonths,
    LoanAmount,
    MonthlyPayment,
    InterestRate,
    EmployeeId,
    PaymentAccountId,
}
