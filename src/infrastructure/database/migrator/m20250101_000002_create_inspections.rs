//! Create inspections table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Inspections::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Inspections::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            );

        // Required text; descriptive ones default to empty
        for column in [
            Inspections::FunctionLocationId,
            Inspections::BuildingName,
            Inspections::FacilityType,
            Inspections::Sprinkler,
            Inspections::FireAlarm,
            Inspections::VcpStatus,
            Inspections::FullInspectionCompleted,
        ] {
            table.col(ColumnDef::new(column).string().not_null());
        }
        for column in [
            Inspections::SapFunctionLocation,
            Inspections::BuildingNumber,
            Inspections::Function,
            Inspections::MacroArea,
            Inspections::MicroArea,
            Inspections::Proponent,
            Inspections::Zone,
            Inspections::HvacType,
            Inspections::PowerSource,
        ] {
            table.col(ColumnDef::new(column).string().not_null().default(""));
        }

        for column in [
            Inspections::SmartPowerMeterStatus,
            Inspections::Eifs,
            Inspections::ExteriorCladdingCondition,
            Inspections::InteriorArchitecturalCondition,
            Inspections::FireProtectionSystemObsolete,
            Inspections::RoofingCondition,
            Inspections::WaterProofingWarranty,
        ] {
            table.col(ColumnDef::new(column).string());
        }
        for column in [
            Inspections::EifsInstalledYear,
            Inspections::HvacCondition,
            Inspections::ElectricalCondition,
        ] {
            table.col(ColumnDef::new(column).integer());
        }
        table
            .col(ColumnDef::new(Inspections::VcpPlannedDate).date())
            .col(ColumnDef::new(Inspections::WaterProofingWarrantyDate).date())
            .col(ColumnDef::new(Inspections::Latitude).double())
            .col(ColumnDef::new(Inspections::Longitude).double());

        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inspections_function_location_id")
                    .table(Inspections::Table)
                    .col(Inspections::FunctionLocationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inspections::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Inspections {
    Table,
    Id,
    FunctionLocationId,
    SapFunctionLocation,
    BuildingName,
    BuildingNumber,
    FacilityType,
    Function,
    MacroArea,
    MicroArea,
    Proponent,
    Zone,
    HvacType,
    Sprinkler,
    FireAlarm,
    PowerSource,
    VcpStatus,
    VcpPlannedDate,
    SmartPowerMeterStatus,
    Eifs,
    EifsInstalledYear,
    ExteriorCladdingCondition,
    InteriorArchitecturalCondition,
    FireProtectionSystemObsolete,
    HvacCondition,
    ElectricalCondition,
    RoofingCondition,
    WaterProofingWarranty,
    WaterProofingWarrantyDate,
    Latitude,
    Longitude,
    FullInspectionCompleted,
}
