use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, ProductPatch};
use crate::domain::types::{
    ImageUrl, ProductPrice, ProductTitle, TypeConstraintError,
};

#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 3))]
    pub title: String,
    #[validate(length(min = 10))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(url)]
    pub image: String,
}

/// Validated payload extracted from an [`AddProductForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddProductFormPayload {
    pub title: ProductTitle,
    pub description: String,
    pub price: ProductPrice,
    pub image: ImageUrl,
}

impl AddProductFormPayload {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            title: self.title,
            description: self.description,
            price: self.price,
            image: self.image,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddProductFormError {
    #[error("Add product form validation failed: {0}")]
    Validation(String),
    #[error("Add product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddProductForm> for AddProductFormPayload {
    type Error = AddProductFormError;

    fn try_from(value: AddProductForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            title: ProductTitle::new(value.title)?,
            description: value.description,
            price: ProductPrice::new(value.price)?,
            image: ImageUrl::new(value.image)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductForm {
    #[validate(length(min = 3))]
    pub title: Option<String>,
    #[validate(length(min = 10))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(url)]
    pub image: Option<String>,
}

/// Validated payload extracted from an [`UpdateProductForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductFormPayload {
    pub title: Option<ProductTitle>,
    pub description: Option<String>,
    pub price: Option<ProductPrice>,
    pub image: Option<ImageUrl>,
}

impl UpdateProductFormPayload {
    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            title: self.title,
            description: self.description,
            price: self.price,
            image: self.image,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateProductFormError {
    #[error("Update product form validation failed: {0}")]
    Validation(String),
    #[error("Update product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateProductForm> for UpdateProductFormPayload {
    type Error = UpdateProductFormError;

    fn try_from(value: UpdateProductForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            title: value.title.map(ProductTitle::new).transpose()?,
            description: value.description,
            price: value.price.map(ProductPrice::new).transpose()?,
            image: value.image.map(ImageUrl::new).transpose()?,
        })
    }
}
