//! Bank parameter (country code + bank number) used for IBAN generation

use crate::error::BusinessResult;
use crate::services::{RequestContext, ServiceContext};
use minibank_core::Parameter;
use minibank_persistence::ParameterRepo;
use tracing::info;

/// Parameter Service - reads and updates the singleton bank parameter
pub struct ParameterService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ParameterService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn get(&self) -> BusinessResult<Parameter> {
        Ok(ParameterRepo::get(self.ctx.pool()).await?)
    }

    /// Update the parameter; the country code is stored uppercased
    pub async fn update(
        &self,
        request: &RequestContext,
        country_code: &str,
        bank_number: &str,
    ) -> BusinessResult<Parameter> {
        let parameter = Parameter::new(country_code, bank_number);
        parameter.validate()?;

        ParameterRepo::upsert(self.ctx.pool(), &parameter).await?;
        info!(parameter = %parameter, employee = %request.employee, "Parameter updated");
        Ok(parameter)
    }
}
