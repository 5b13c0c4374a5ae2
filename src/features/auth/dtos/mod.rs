mod auth_dto;

pub use auth_dto::{
    AdminLoginRequestDto, AuthResponseDto, LoginRequestDto, MeResponseDto, SessionUserDto,
    SignupRequestDto, SignupResponseDto,
};
