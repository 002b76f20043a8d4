use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Error(pub String);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ID(pub u128);

pub trait Get<T, U> {
    fn get(&self) -> Result<U, Error>;
}

pub trait Set<T, U> {
    fn set(&mut self, target: &U) -> Result<(), Error>;
}

pub trait GetRequest<T, U, R>
where
    T: Get<T, U>,
    R: GetResponse<T, U>,
{
    fn get_response(self, target: &T) -> R;
    fn get_id(&self) -> ID;
}

pub trait SetRequest<T, U, R>
where
    T: Set<T, U>,
    R: SetResponse<T, U>,
{
    fn get_candidate(&self) -> &U;
    fn get_response(self, target: &mut T) -> R;
    fn get_id(&self) -> ID;
}

pub trait GetResponse<T, U>
where
    T: Get<T, U>,
{
    fn get_result(self) -> Result<U, Error>;
    fn get_id(&self) -> ID;
}

pub trait SetResponse<T, U>
where
    T: Set<T, U>,
{
    fn get_candidate(&self) -> &U;
    fn get_result(self) -> Result<(), Error>;
    fn get_id(&self) -> ID;
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(bound(serialize = "U: Serialize", deserialize = "U: Deserialize<'de>"))]
pub struct BasicGetResponse<T, U>(pub ID, pub Result<U, Error>, pub PhantomData<T>);

impl<T, U> GetResponse<T, U> for BasicGetResponse<T, U>
where
    T: Get<T, U>,
{
    fn get_id(&self) -> ID {
        return self.0;
    }
    fn get_result(self) -> Result<U, Error> {
        return self.1;
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(bound = "")]
pub struct BasicGetRequest<T, U>(pub ID, pub PhantomData<T>, pub PhantomData<U>);

impl<T, U> BasicGetRequest<T, U> {
    pub fn new(id: ID) -> BasicGetRequest<T, U> {
        BasicGetRequest(id, PhantomData, PhantomData)
    }
}

impl<T, U> GetRequest<T, U, BasicGetResponse<T, U>> for BasicGetRequest<T, U>
where
    T: Get<T, U>,
{
    fn get_response(self, target: &T) -> BasicGetResponse<T, U> {
        let result = target.get();
        BasicGetResponse(self.0, result, PhantomData)
    }
    fn get_id(&self) -> ID {
        return self.0;
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(bound(serialize = "U: Serialize", deserialize = "U: Deserialize<'de>"))]
pub struct BasicSetResponse<T, U>(pub ID, pub U, pub Result<(), Error>, pub PhantomData<T>);

impl<T, U> SetResponse<T, U> for BasicSetResponse<T, U>
where
    T: Set<T, U>,
{
    fn get_id(&self) -> ID {
        return self.0;
    }
    fn get_result(self) -> Result<(), Error> {
        return self.2;
    }
    fn get_candidate(&self) -> &U {
        return &self.1;
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(bound(serialize = "U: Serialize", deserialize = "U: Deserialize<'de>"))]
pub struct BasicSetRequest<T, U>(pub ID, pub U, pub PhantomData<T>);

impl<T, U> BasicSetRequest<T, U> {
    pub fn new(id: ID, candidate: U) -> BasicSetRequest<T, U> {
        BasicSetRequest(id, candidate, PhantomData)
    }
}

impl<T, U> SetRequest<T, U, BasicSetResponse<T, U>> for BasicSetRequest<T, U>
where
    T: Set<T, U>,
{
    fn get_response(self, target: &mut T) -> BasicSetResponse<T, U> {
        let result = target.set(&self.1);
        BasicSetResponse(self.0, self.1, result, self.2)
    }
    fn get_id(&self) -> ID {
        return self.0;
    }
    fn get_candidate(&self) -> &U {
        return &self.1;
    }
}
